use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::cv::extraction::handle_extraction;
use crate::cv::prompts::build_extraction_prompt;
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::candidate::CandidateRecord;
use crate::store::CandidateStore;

#[derive(Debug, Serialize)]
pub struct IngestedCv {
    pub cv_id: Uuid,
    pub incomplete: bool,
    pub parse_failed: bool,
    pub data: CandidateRecord,
}

/// Runs one CV through the model and stores the result.
///
/// A model reply that cannot be parsed still produces a (fallback) record. A failed model
/// call is `AppError::Llm`; a failed insert is `AppError::Persistence` with the record.
pub async fn ingest_cv(
    cv_text: &str,
    job_title: Option<&str>,
    llm: &dyn TextGenerator,
    store: &dyn CandidateStore,
) -> Result<IngestedCv, AppError> {
    let prompt = build_extraction_prompt(cv_text);

    info!("Sending CV ({} chars) to the extraction model", cv_text.len());
    let raw = llm
        .generate(&prompt)
        .await
        .map_err(|e| AppError::Llm(format!("CV extraction failed: {e}")))?;
    info!("Received extraction response ({} chars)", raw.len());

    let extracted = handle_extraction(&raw, job_title);

    let cv_id = match store.store(&extracted.record).await {
        Ok(id) => id,
        Err(source) => {
            error!("Failed to store analyzed CV: {source}");
            return Err(AppError::Persistence {
                analysis: Box::new(extracted.record),
                source,
            });
        }
    };

    info!(%cv_id, parse_failed = extracted.parse_failed, "Stored analyzed CV");

    Ok(IngestedCv {
        cv_id,
        incomplete: extracted.incomplete,
        parse_failed: extracted.parse_failed,
        data: extracted.record,
    })
}
