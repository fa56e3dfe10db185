//! Axum route handlers for the CV API.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use tracing::info;

use crate::cv::document::{extract_text, DocumentFormat};
use crate::cv::ingest::{ingest_cv, IngestedCv};
use crate::errors::AppError;
use crate::models::candidate::StoredCandidate;
use crate::state::AppState;

struct UploadForm {
    file_name: String,
    bytes: Bytes,
    /// `None` when the form had no `job_title` field at all.
    job_title: Option<String>,
}

/// POST /api/v1/cvs/analyze
///
/// Multipart form: `file` (PDF, DOCX or TXT) and optional `job_title`.
/// Extracts the document text, runs it through the model and stores the record.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<IngestedCv>, AppError> {
    let form = read_upload_form(multipart).await?;
    let format = DocumentFormat::from_file_name(&form.file_name)?;

    info!("Extracting text from {} ({} bytes)", form.file_name, form.bytes.len());
    let bytes = form.bytes;
    let text = tokio::task::spawn_blocking(move || extract_text(format, &bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Text extraction task failed: {e}")))??;

    let ingested = ingest_cv(
        &text,
        form.job_title.as_deref(),
        state.llm.as_ref(),
        state.store.as_ref(),
    )
    .await?;

    Ok(Json(ingested))
}

/// GET /api/v1/cvs
///
/// Returns every stored CV, newest first.
pub async fn handle_list_cvs(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredCandidate>>, AppError> {
    let mut cvs = state.store.fetch_all_candidates().await?;
    cvs.reverse();
    Ok(Json(cvs))
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut job_title: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;
                file = Some((file_name, bytes));
            }
            Some("job_title") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid job_title: {e}")))?;
                job_title = Some(text);
            }
            _ => {}
        }
    }

    let (file_name, bytes) =
        file.ok_or_else(|| AppError::Validation("No file received.".to_string()))?;

    Ok(UploadForm {
        file_name,
        bytes,
        job_title,
    })
}
