use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every pipeline failure keeps its own variant so clients can tell
/// "unsupported file type" apart from "AI parsing failed" or "could not generate PDF".
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Normalization failed: {0}")]
    NormalizationFailed(String),

    #[error("Render failed: {0}")]
    RenderFailed(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code returned in the error body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::UnsupportedMediaType(_) => "UNSUPPORTED_MEDIA_TYPE",
            AppError::ExtractionFailed(_) => "EXTRACTION_FAILED",
            AppError::NormalizationFailed(_) => "NORMALIZATION_FAILED",
            AppError::RenderFailed(_) => "RENDER_FAILED",
            AppError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        AppError::StoreUnavailable(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message) = match &self {
            AppError::UnsupportedMediaType(detail) => {
                tracing::warn!("Rejected upload: {detail}");
                (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "Unsupported file type. Upload PDF or DOCX.".to_string(),
                )
            }
            AppError::ExtractionFailed(detail) => {
                tracing::error!("Extraction error: {detail}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Could not read text from the document".to_string(),
                )
            }
            AppError::NormalizationFailed(detail) => {
                tracing::error!("Normalization error: {detail}");
                (StatusCode::BAD_GATEWAY, "AI parsing failed".to_string())
            }
            AppError::RenderFailed(detail) => {
                tracing::error!("Render error: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not generate PDF".to_string(),
                )
            }
            AppError::StoreUnavailable(detail) => {
                tracing::error!("Store error: {detail}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "The record store is unavailable".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
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
