//! HTTP API module.
//!
//! Review flow endpoints: supervisor selection, decisions, confirmed summary and weekly export.

mod export;
mod review;
mod summary;

pub use export::*;
pub use review::*;
pub use summary::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::models::ReviewView;
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::ApiError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// The supervisor picker. A directory that cannot be read still renders, with an empty list.
fn selection_view(state: &AppState, message: Option<&str>) -> ReviewView {
    let supervisors = state
        .directory
        .list_supervisors()
        .map(|names| names.into_iter().collect())
        .unwrap_or_else(|e| {
            tracing::warn!("Supervisor list unavailable: {}", e);
            Vec::new()
        });

    ReviewView::selection(supervisors, message.map(str::to_string))
}
