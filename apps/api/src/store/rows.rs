//! Row types for the `cvs` and `jobs` tables and their conversion into domain types.
//!
//! JSON columns are decoded one at a time. A column holding the wrong shape falls back to
//! an empty list for that column only; the rest of the row is kept.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use sqlx::FromRow;
use tracing::warn;
use uuid::Uuid;

use crate::models::candidate::{non_empty, CandidateRecord, StoredCandidate};
use crate::models::job::JobPosting;
use crate::ranking::normalizer::coerce_string_list;

#[derive(Debug, Clone, FromRow)]
pub struct CvRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub skills: Option<Value>,
    pub experience: Option<Value>,
    pub education: Option<Value>,
    pub summary: Option<String>,
    pub job_title: Option<String>,
    pub parse_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub title: String,
    pub skills: Option<Value>,
}

impl From<CvRow> for StoredCandidate {
    fn from(row: CvRow) -> Self {
        let id = row.id;
        StoredCandidate {
            id,
            record: CandidateRecord {
                name: non_empty(row.name),
                email: non_empty(row.email),
                skills: decode_string_list(row.skills, "skills", id),
                experience: decode_or_default(row.experience, "experience", id),
                education: decode_or_default(row.education, "education", id),
                summary: non_empty(row.summary),
                job_title: non_empty(row.job_title),
                parse_error: row.parse_error,
                created_at: row.created_at,
            },
        }
    }
}

impl From<JobRow> for JobPosting {
    fn from(row: JobRow) -> Self {
        JobPosting {
            required_skills: decode_string_list(row.skills, "skills", row.id),
            title: row.title,
        }
    }
}

/// Decodes a JSON column into `T`, or `T::default()` when the column is null or malformed.
pub fn decode_or_default<T>(value: Option<Value>, field: &str, row_id: Uuid) -> T
where
    T: DeserializeOwned + Default,
{
    match value {
        None | Some(Value::Null) => T::default(),
        Some(v) => serde_json::from_value(v).unwrap_or_else(|e| {
            warn!(%row_id, field, "Malformed stored JSON, using empty value: {e}");
            T::default()
        }),
    }
}

/// Like [`decode_or_default`] for string lists, but keeps arrays with non-string elements.
pub fn decode_string_list(value: Option<Value>, field: &str, row_id: Uuid) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(v) if v.is_array() => coerce_string_list(&v),
        Some(_) => {
            warn!(%row_id, field, "Stored value is not an array, using empty list");
            Vec::new()
        }
    }
}
