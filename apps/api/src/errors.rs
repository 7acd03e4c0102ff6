use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::pipeline::AnalysisError;
use crate::analysis::providers::ServiceError;
use crate::extract::ExtractError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Analysis timed out after {0}s")]
    Timeout(u64),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractError> for AppError {
    fn from(e: ExtractError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Analysis(AnalysisError::Input(field)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("{field} is empty or could not be extracted"),
            ),
            AppError::Analysis(e) => {
                let service = e.service_error().map_or("-", ServiceError::service);
                tracing::error!(service, "Analysis error: {e}");
                let (status, code) = match e.service_error() {
                    Some(
                        ServiceError::Authentication { .. }
                        | ServiceError::MissingCredentials { .. },
                    ) => (StatusCode::BAD_GATEWAY, "UPSTREAM_AUTH_ERROR"),
                    Some(ServiceError::Transient { .. }) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "UPSTREAM_UNAVAILABLE")
                    }
                    _ => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
                };
                (status, code, e.to_string())
            }
            AppError::Timeout(secs) => (
                StatusCode::GATEWAY_TIMEOUT,
                "ANALYSIS_TIMEOUT",
                format!("Analysis did not finish within {secs}s"),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
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
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
