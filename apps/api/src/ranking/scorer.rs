//! Match scoring: share of a job's required skills present in a candidate's skill set.
//!
//! Algorithm:
//! 1. Normalize both sides; the candidate side becomes a set.
//! 2. `matched` = normalized job skills that are in the set, in job order. Duplicates in
//!    the job list are matched (and counted) once per occurrence.
//! 3. `score` = round(matched / job × 100), half rounds up.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ranking::normalizer::normalize_skills;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub score: u32, // 0 – 100
    pub matched: Vec<String>,
}

pub fn compute_match<C, J>(candidate_skills: &[C], job_skills: &[J]) -> SkillMatch
where
    C: AsRef<str>,
    J: AsRef<str>,
{
    let job = normalize_skills(job_skills);
    if job.is_empty() {
        return SkillMatch {
            score: 0,
            matched: vec![],
        };
    }

    let candidate: HashSet<String> = normalize_skills(candidate_skills).into_iter().collect();
    let matched: Vec<String> = job
        .iter()
        .filter(|skill| candidate.contains(skill.as_str()))
        .cloned()
        .collect();

    SkillMatch {
        score: percent_rounded(matched.len(), job.len()),
        matched,
    }
}

/// `part / whole × 100` rounded half-up, in integer arithmetic so 2/3 is always 67.
fn percent_rounded(part: usize, whole: usize) -> u32 {
    debug_assert!(whole > 0 && part <= whole);
    ((part * 200 + whole) / (whole * 2)) as u32
}
