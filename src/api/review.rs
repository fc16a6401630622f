//! Review flow endpoints.

use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Form,
};
use serde::Deserialize;

use super::{selection_view, success, ApiResponse, ApiResult};
use crate::errors::{ApiError, AppError};
use crate::models::ReviewView;
use crate::review::{messages, Decision, DecisionOutcome, ReviewSession};
use crate::session::{session_headers, token_from_headers};
use crate::AppState;

/// Form posted to select a supervisor.
#[derive(Debug, Deserialize)]
pub struct SelectionForm {
    #[serde(default)]
    pub encarregado: Option<String>,
}

/// Form posted with a decision on the current record.
#[derive(Debug, Deserialize)]
pub struct ActionForm {
    #[serde(default)]
    pub acao: Option<String>,
    #[serde(default)]
    pub justificativa: Option<String>,
}

/// GET / - Supervisor picker.
pub async fn selection_page(State(state): State<AppState>) -> ApiResult<ReviewView> {
    success(selection_view(&state, None))
}

/// POST / - Select a supervisor and start reviewing their pending absences.
pub async fn select_supervisor(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<SelectionForm>,
) -> Result<Response, ApiError> {
    let Some(input) = form.encarregado else {
        return Ok(ApiResponse::new(selection_view(&state, None)).into_response());
    };

    let absences = state.absences.load_absences()?;
    let responses = state.ledger.load_all()?;
    let supervisors = state.directory.list_supervisors()?;

    let session = match ReviewSession::start(&input, &supervisors, absences, &responses) {
        Ok(session) => session,
        Err(e @ AppError::Validation(_)) => {
            let view = ReviewView::selection(supervisors.into_iter().collect(), Some(e.message()));
            return Err(ApiError::with_view(e, view));
        }
        Err(e) => return Err(e.into()),
    };

    let view = session.view(None);
    let existing = match token_from_headers(&headers) {
        Some(token) => state.sessions.get(&token).await.map(|_| token),
        None => None,
    };
    let token = match existing {
        Some(token) => {
            state.sessions.set(&token, session).await;
            token
        }
        None => state.sessions.create(session).await,
    };

    Ok((session_headers(&token), ApiResponse::new(view)).into_response())
}

/// POST /acao - Justify or confirm the current record.
pub async fn submit_action(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ActionForm>,
) -> ApiResult<ReviewView> {
    tracing::debug!("Form data: {:?}", form);

    let invalid_session = || {
        ApiError::with_view(
            AppError::SessionInvalid(messages::SESSION_INVALID.to_string()),
            selection_view(&state, Some(messages::SESSION_INVALID)),
        )
    };
    let Some(token) = token_from_headers(&headers) else {
        return Err(invalid_session());
    };

    let decision = Decision::parse(
        form.acao.as_deref(),
        form.justificativa.as_deref().unwrap_or_default(),
    );
    let now = chrono::Local::now().naive_local();

    let applied = state
        .sessions
        .update(&token, |session| {
            match session.decide(decision, now, &state.ledger) {
                Ok(outcome) => Ok((outcome, session.view(None))),
                Err(e) => {
                    let view = session.view(Some(e.message()));
                    Err(ApiError::with_view(e, view))
                }
            }
        })
        .await
        .ok_or_else(invalid_session)?;

    let (outcome, view) = applied?;
    if let DecisionOutcome::Recorded(record) = &outcome {
        tracing::debug!(
            "{} recorded {} for {} on {}",
            record.supervisor,
            record.action.as_str(),
            record.employee_id,
            record.date
        );
    }
    success(view)
}
