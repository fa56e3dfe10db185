use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A single work-history line as extracted from a CV. All fields are free-form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub institution: Option<String>,
    /// Models often emit `"year": 2019`; the number is kept as its text.
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: Option<String>,
}

/// Structured CV data produced by the extraction step.
///
/// `skills`, `experience` and `education` are always concrete sequences, even when the
/// source was missing or malformed. `job_title` only ever comes from the uploader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: Option<String>,
    pub email: Option<String>,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub summary: Option<String>,
    pub job_title: Option<String>,
    /// Set only on fallback records, where `summary` holds the raw model output.
    pub parse_error: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl CandidateRecord {
    pub fn empty(created_at: DateTime<Utc>) -> Self {
        Self {
            name: None,
            email: None,
            skills: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
            summary: None,
            job_title: None,
            parse_error: None,
            created_at,
        }
    }

    /// Neither a name nor an email could be extracted.
    pub fn is_incomplete(&self) -> bool {
        self.name.is_none() && self.email.is_none()
    }

    pub fn is_fallback(&self) -> bool {
        self.parse_error.is_some()
    }
}

/// A record as read back from storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredCandidate {
    pub id: Uuid,
    #[serde(flatten)]
    pub record: CandidateRecord,
}

/// Treats `""` as absent, matching how the store writes optional text columns.
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

/// Accepts a string, any other scalar (stringified) or null.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}
