use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::evaluation::pipeline::EvaluationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad or missing user input. Nothing was extracted or sent to the model.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Extraction or model failure. The message is shown to the user as-is.
    #[error("{0}")]
    Evaluation(String),

    /// Upload exceeded `MAX_UPLOAD_BYTES`.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
}

impl From<EvaluationError> for AppError {
    fn from(err: EvaluationError) -> Self {
        match err {
            EvaluationError::MissingInput => AppError::Validation(err.to_string()),
            EvaluationError::Extraction(_) | EvaluationError::Model(_) => {
                AppError::Evaluation(err.to_string())
            }
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge(
                "The uploaded resume exceeds the maximum allowed size.".to_string(),
            );
        }
        AppError::Validation(format!("Invalid form data: {}", err.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Evaluation(msg) => {
                tracing::error!("Evaluation failed: {msg}");
                (StatusCode::BAD_GATEWAY, "EVALUATION_FAILED", msg.clone())
            }
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
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
