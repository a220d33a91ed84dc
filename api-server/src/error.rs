//! Error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use studata_core::{CoreError, ErrorKind};

pub type AppResult<T> = Result<T, AppError>;

/// Message returned for every failure whose details must stay server-side
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Resource errors
    #[error("{0}")]
    NotFound(String),

    // Validation errors
    #[error("{0}")]
    ValidationError(String),

    // Preprocessing, prediction or attribution failed
    #[error("computation failed: {0}")]
    ComputationFailed(String),

    // Generic errors
    #[error("internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::ComputationFailed(msg) => {
                tracing::error!("Computation error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err.kind() {
            ErrorKind::NotFound => AppError::NotFound(err.to_string()),
            ErrorKind::Computation => AppError::ComputationFailed(err.to_string()),
            ErrorKind::Initialization => AppError::InternalError(err.to_string()),
        }
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(format!("blocking task failed: {err}"))
    }
}
