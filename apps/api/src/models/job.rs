use serde::{Deserialize, Serialize};

/// A job opening candidates are ranked against.
///
/// `title` is the grouping key: candidates are attached by case-insensitive equality
/// with their `job_title`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
}
