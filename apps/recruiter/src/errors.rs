use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::matching::extractor::ExtractionError;
use crate::session::SessionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Extraction(ExtractionError::EmptyDescription) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            AppError::Extraction(ExtractionError::NotConfigured) => {
                (StatusCode::SERVICE_UNAVAILABLE, "LLM_NOT_CONFIGURED")
            }
            AppError::Extraction(ExtractionError::Llm(e)) => {
                tracing::error!("LLM error: {e}");
                (StatusCode::BAD_GATEWAY, "LLM_ERROR")
            }
            AppError::Session(SessionError::EmptySelection)
            | AppError::Session(SessionError::DuplicateCandidate(_)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            AppError::Session(SessionError::UnknownJob(_))
            | AppError::Session(SessionError::NotShortlisted { .. }) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND")
            }
            AppError::Session(SessionError::NotEnoughFinalists { .. }) => {
                (StatusCode::CONFLICT, "NOT_ENOUGH_FINALISTS")
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string()
            }
        }));

        (status, body).into_response()
    }
}
