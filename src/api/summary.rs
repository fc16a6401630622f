//! Confirmed-records summary endpoint.

use axum::{extract::State, http::HeaderMap};

use super::{selection_view, success, ApiResult};
use crate::errors::{ApiError, AppError};
use crate::models::SummaryView;
use crate::review::{messages, summarize};
use crate::session::token_from_headers;
use crate::AppState;

/// GET /resumo - Absences the session's supervisor confirmed.
pub async fn summary(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<SummaryView> {
    let session = match token_from_headers(&headers) {
        Some(token) => state.sessions.get(&token).await,
        None => None,
    };
    let Some(session) = session else {
        return Err(ApiError::with_view(
            AppError::SessionInvalid(messages::LOAD_FIRST.to_string()),
            selection_view(&state, Some(messages::LOAD_FIRST)),
        ));
    };

    let records = summarize(state.ledger.load_all()?, session.supervisor());
    let message = records
        .is_empty()
        .then(|| messages::NOTHING_CONFIRMED.to_string());

    success(SummaryView {
        supervisor: session.supervisor().to_string(),
        records,
        message,
    })
}
