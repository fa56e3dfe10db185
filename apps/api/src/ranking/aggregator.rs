//! Ranking: groups stored candidates under each job posting and orders them by match score.
//!
//! Each job scans every candidate (O(jobs × candidates)), which is fine for the record
//! counts this service handles. There is no index on `job_title`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::candidate::StoredCandidate;
use crate::models::job::JobPosting;
use crate::ranking::scorer::compute_match;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub score: u32,
    pub matched: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingGroup {
    pub job_title: String,
    pub required_skills: Vec<String>,
    pub candidates: Vec<RankedCandidate>,
}

/// Builds one group per job, in job order.
///
/// Candidates are sorted by score, highest first. The sort is stable, so equal scores
/// keep the order they were passed in.
pub fn rank(candidates: &[StoredCandidate], jobs: &[JobPosting]) -> Vec<RankingGroup> {
    jobs.iter().map(|job| rank_for_job(candidates, job)).collect()
}

fn rank_for_job(candidates: &[StoredCandidate], job: &JobPosting) -> RankingGroup {
    let title = job.title.to_lowercase();

    let mut ranked: Vec<RankedCandidate> = candidates
        .iter()
        .filter(|cv| cv.record.job_title.as_deref().unwrap_or("").to_lowercase() == title)
        .map(|cv| {
            let result = compute_match(&cv.record.skills, &job.required_skills);
            RankedCandidate {
                id: cv.id,
                name: cv.record.name.clone(),
                email: cv.record.email.clone(),
                score: result.score,
                matched: result.matched,
                created_at: cv.record.created_at,
            }
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));

    RankingGroup {
        job_title: job.title.clone(),
        required_skills: job.required_skills.clone(),
        candidates: ranked,
    }
}
