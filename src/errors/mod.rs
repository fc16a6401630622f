//! Error handling module for the absence review backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::models::ReviewView;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const SOURCE_UNAVAILABLE: &str = "SOURCE_UNAVAILABLE";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const PERSISTENCE_ERROR: &str = "PERSISTENCE_ERROR";
    pub const SESSION_INVALID: &str = "SESSION_INVALID";
    pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Absence spreadsheet or supervisor list missing or malformed
    SourceUnavailable(String),
    /// Input rejected; state unchanged
    Validation(String),
    /// Ledger write or export failed
    Persistence(String),
    /// Session state missing or expired
    SessionInvalid(String),
    /// Bad configuration value
    Config(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::SourceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::SessionInvalid(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::SourceUnavailable(_) => codes::SOURCE_UNAVAILABLE,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Persistence(_) => codes::PERSISTENCE_ERROR,
            AppError::SessionInvalid(_) => codes::SESSION_INVALID,
            AppError::Config(_) => codes::CONFIG_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::SourceUnavailable(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Persistence(msg) => msg.clone(),
            AppError::SessionInvalid(msg) => msg.clone(),
            AppError::Config(msg) => msg.clone(),
        }
    }

    /// Whether the user can act on the error and carry on from the same state.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_) | AppError::Persistence(_) | AppError::SessionInvalid(_)
        )
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<calamine::Error> for AppError {
    fn from(err: calamine::Error) -> Self {
        tracing::error!("Spreadsheet error: {:?}", err);
        AppError::SourceUnavailable(format!("Spreadsheet error: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError, view: Option<&ReviewView>) -> Self {
        let details = view.and_then(|v| serde_json::to_value(v).ok());

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
                details,
            },
        }
    }
}

/// Wrapper type for errors that carry the review view the user should return to.
#[derive(Debug)]
pub struct ApiError {
    pub error: AppError,
    pub view: Option<ReviewView>,
}

impl ApiError {
    pub fn with_view(error: AppError, view: ReviewView) -> Self {
        Self {
            error,
            view: Some(view),
        }
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self { error, view: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.error.is_recoverable() {
            tracing::warn!("{}", self.error);
        } else {
            tracing::error!("{}", self.error);
        }

        let status = self.error.status_code();
        let body = ErrorResponse::new(&self.error, self.view.as_ref());
        (status, Json(body)).into_response()
    }
}
