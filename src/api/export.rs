//! Weekly export endpoint.

use axum::extract::{Query, State};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::export::export_week;
use crate::models::ExportReport;
use crate::AppState;

/// Query parameters for an export run.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Any day inside the week to export; defaults to today
    #[serde(default)]
    pub referencia: Option<NaiveDate>,
}

/// POST /exportacao - Write the ledger snapshot for one week.
pub async fn export_weekly(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> ApiResult<ExportReport> {
    let reference = match query.referencia {
        Some(day) => day.and_time(NaiveTime::MIN),
        None => chrono::Local::now().naive_local(),
    };

    let report = export_week(&state.ledger, &state.config.export_dir, reference)?;
    success(report)
}
