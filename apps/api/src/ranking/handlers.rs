//! Axum route handlers for job postings and the ranking view.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::job::JobPosting;
use crate::ranking::aggregator::{rank, RankingGroup};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub job_id: Uuid,
}

/// GET /api/v1/ranking
///
/// Scores every stored CV against the postings sharing its job title.
/// Reads a full snapshot of both tables per request.
pub async fn handle_ranking(
    State(state): State<AppState>,
) -> Result<Json<Vec<RankingGroup>>, AppError> {
    let candidates = state.store.fetch_all_candidates().await?;
    let jobs = state.store.fetch_all_jobs().await?;
    Ok(Json(rank(&candidates, &jobs)))
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    Ok(Json(state.store.fetch_all_jobs().await?))
}

/// POST /api/v1/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<CreateJobResponse>), AppError> {
    if request.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let job = JobPosting {
        title: request.title,
        required_skills: request.required_skills,
    };
    let job_id = state.store.create_job(&job).await?;

    Ok((StatusCode::CREATED, Json(CreateJobResponse { job_id })))
}
