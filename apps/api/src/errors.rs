use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::cv::document::DocumentError;
use crate::models::candidate::CandidateRecord;
use crate::store::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// The generative-AI call itself failed. Distinct from a response that could not be
    /// parsed, which is handled as a fallback record.
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Extraction succeeded but the record could not be stored. Carries the extracted
    /// data so the caller can retry storage without re-running extraction.
    #[error("CV analysis succeeded but storage failed: {source}")]
    Persistence {
        analysis: Box<CandidateRecord>,
        source: StorageError,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Document(DocumentError::UnsupportedFormat) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_FORMAT",
                DocumentError::UnsupportedFormat.to_string(),
            ),
            AppError::Document(e) => {
                tracing::warn!("Document extraction failed: {e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "DOCUMENT_UNREADABLE",
                    e.to_string(),
                )
            }
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "The AI extraction service failed".to_string(),
                )
            }
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Persistence { analysis, source } => {
                tracing::error!("Storing analyzed CV failed: {source}");
                let body = Json(json!({
                    "error": {
                        "code": "STORAGE_ERROR",
                        "message": "CV analysis succeeded but storage failed"
                    },
                    "analysis_data": analysis,
                    "storage_error": source.to_string()
                }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
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
