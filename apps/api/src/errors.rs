use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::background::{FetchError, RemovalError};

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<RemovalError> for AppError {
    fn from(err: RemovalError) -> Self {
        match err {
            RemovalError::UnsupportedMethod(_)
            | RemovalError::InvalidColor(_)
            | RemovalError::MissingMask => AppError::Validation(err.to_string()),
            RemovalError::Decode(_) | RemovalError::Encode(_) | RemovalError::InvalidBuffer(_) => {
                AppError::Processing(err.to_string())
            }
        }
    }
}

impl From<FetchError> for AppError {
    fn from(err: FetchError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Upstream(msg) => {
                tracing::error!("Upstream error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    msg.clone(),
                )
            }
            AppError::Processing(msg) => {
                tracing::error!("Processing error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PROCESSING_ERROR",
                    msg.clone(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "code": code
        }));

        (status, body).into_response()
    }
}
