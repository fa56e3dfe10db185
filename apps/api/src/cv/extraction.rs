//! Extraction result handling: turns raw model output into a `CandidateRecord`.
//!
//! Two terminal outcomes:
//! - `Parsed`: the output (optionally wrapped in a markdown fence) is a JSON object.
//! - `Fallback`: anything else. The raw text is kept as the summary and the record is
//!   marked with `parse_error`. This is not an error; the record is still stored.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::warn;

use crate::models::candidate::{non_empty, CandidateRecord};
use crate::ranking::normalizer::coerce_string_list;

/// Marker stored in `parse_error` on fallback records.
pub const FALLBACK_MARKER: &str = "Failed to parse full response";

#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    Parsed(CandidateRecord),
    Fallback { raw_text: String, reason: String },
}

/// Result of handling one model response.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedCv {
    pub record: CandidateRecord,
    pub parse_failed: bool,
    /// Neither name nor email was found. Advisory only.
    pub incomplete: bool,
}

/// Parses model output and applies the uploader's job title.
///
/// `caller_job_title` is `None` when the uploader sent no title at all. `Some("")` still
/// counts as provided and clears the title.
pub fn handle_extraction(raw_text: &str, caller_job_title: Option<&str>) -> ExtractedCv {
    let created_at = Utc::now();
    let outcome = parse_model_output(raw_text, created_at);

    if let ExtractionOutcome::Fallback { reason, .. } = &outcome {
        warn!(reason = %reason, "Model output is not a JSON object; storing raw text as summary");
    }

    let mut record = outcome.into_record(created_at);
    if let Some(title) = caller_job_title {
        record.job_title = non_empty(Some(title.to_string()));
    }

    let parse_failed = record.is_fallback();
    let incomplete = record.is_incomplete();
    if incomplete {
        warn!("Extracted CV has neither name nor email");
    }

    ExtractedCv {
        record,
        parse_failed,
        incomplete,
    }
}

pub fn parse_model_output(raw_text: &str, created_at: DateTime<Utc>) -> ExtractionOutcome {
    let body = strip_json_fences(raw_text);
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(fields)) => ExtractionOutcome::Parsed(record_from_fields(fields, created_at)),
        Ok(other) => ExtractionOutcome::Fallback {
            raw_text: raw_text.to_string(),
            reason: format!("expected a JSON object, got {}", json_kind(&other)),
        },
        Err(e) => ExtractionOutcome::Fallback {
            raw_text: raw_text.to_string(),
            reason: e.to_string(),
        },
    }
}

impl ExtractionOutcome {
    pub fn into_record(self, created_at: DateTime<Utc>) -> CandidateRecord {
        match self {
            ExtractionOutcome::Parsed(record) => record,
            ExtractionOutcome::Fallback { raw_text, .. } => CandidateRecord {
                summary: Some(raw_text),
                parse_error: Some(FALLBACK_MARKER.to_string()),
                ..CandidateRecord::empty(created_at)
            },
        }
    }
}

/// Builds a record from the model's JSON object. The object's own `job_title`, if any,
/// is ignored; that field only comes from the uploader.
fn record_from_fields(mut fields: Map<String, Value>, created_at: DateTime<Utc>) -> CandidateRecord {
    let skills = fields
        .get("skills")
        .map(coerce_string_list)
        .unwrap_or_default();

    CandidateRecord {
        name: text_field(&fields, "name"),
        email: text_field(&fields, "email"),
        summary: text_field(&fields, "summary"),
        skills,
        experience: list_field(&mut fields, "experience"),
        education: list_field(&mut fields, "education"),
        job_title: None,
        parse_error: None,
        created_at,
    }
}

/// Decodes an array field, or an empty list when it is missing or has the wrong shape.
fn list_field<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str) -> Vec<T> {
    match fields.remove(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            warn!(field = key, "Ignoring malformed list in model output: {e}");
            Vec::new()
        }),
    }
}

/// Reads a scalar field as text. Empty strings, null, arrays and objects are absent.
fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key)? {
        Value::String(s) => non_empty(Some(s.clone())),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_RESPONSE: &str = r#"{
        "name": "Grace Hopper",
        "email": "grace@example.com",
        "skills": ["COBOL", " Compilers ", 42],
        "experience": [{ "title": "Rear Admiral", "company": "US Navy", "duration": "43 years" }],
        "education": [{ "degree": "PhD Mathematics", "institution": "Yale", "year": 1934 }],
        "summary": "Pioneer of machine-independent programming languages."
    }"#;

    #[test]
    fn test_strip_json_fences_with_json_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_without_tag() {
        let input = "```\n{\"key\": \"value\"}\n```";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_strip_json_fences_no_fences() {
        let input = "{\"key\": \"value\"}";
        assert_eq!(strip_json_fences(input), "{\"key\": \"value\"}");
    }

    #[test]
    fn test_parsed_response_fills_record() {
        let result = handle_extraction(FULL_RESPONSE, None);
        assert!(!result.parse_failed);
        assert!(!result.incomplete);

        let record = result.record;
        assert_eq!(record.name.as_deref(), Some("Grace Hopper"));
        assert_eq!(record.email.as_deref(), Some("grace@example.com"));
        assert_eq!(record.skills, vec!["COBOL", " Compilers ", "42"]);
        assert_eq!(record.experience[0].company.as_deref(), Some("US Navy"));
        assert_eq!(record.education[0].year.as_deref(), Some("1934"));
        assert!(record.parse_error.is_none());
        assert!(record.job_title.is_none());
    }

    #[test]
    fn test_fenced_response_is_parsed() {
        let fenced = format!("```json\n{FULL_RESPONSE}\n```");
        let result = handle_extraction(&fenced, None);
        assert!(!result.parse_failed);
        assert_eq!(result.record.name.as_deref(), Some("Grace Hopper"));
    }

    #[test]
    fn test_non_json_falls_back_to_raw_summary() {
        let raw = "Sorry, I could not read this CV.";
        let result = handle_extraction(raw, None);

        assert!(result.parse_failed);
        assert_eq!(result.record.summary.as_deref(), Some(raw));
        assert_eq!(result.record.parse_error.as_deref(), Some(FALLBACK_MARKER));
        assert!(result.record.is_fallback());
        assert!(result.record.name.is_none());
        assert!(result.record.email.is_none());
        assert!(result.record.skills.is_empty());
        assert!(result.incomplete);
    }

    #[test]
    fn test_fallback_summary_keeps_fences_verbatim() {
        let raw = "```json\n{ \"name\": \"broken\" \n```";
        let result = handle_extraction(raw, None);
        assert!(result.parse_failed);
        assert_eq!(result.record.summary.as_deref(), Some(raw));
    }

    #[test]
    fn test_json_array_is_a_parse_failure() {
        let outcome = parse_model_output("[1, 2, 3]", Utc::now());
        match outcome {
            ExtractionOutcome::Fallback { reason, .. } => assert!(reason.contains("an array")),
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn test_null_and_malformed_lists_become_empty() {
        let raw = r#"{
            "name": "Alan Turing",
            "skills": null,
            "experience": "Bletchley Park",
            "education": [{ "degree": "BA", "institution": "King's College" }]
        }"#;
        let record = handle_extraction(raw, None).record;
        assert!(record.skills.is_empty());
        assert!(record.experience.is_empty());
        assert_eq!(record.education.len(), 1);
    }

    #[test]
    fn test_caller_job_title_is_applied() {
        let result = handle_extraction(FULL_RESPONSE, Some("Backend Developer"));
        assert_eq!(result.record.job_title.as_deref(), Some("Backend Developer"));
    }

    #[test]
    fn test_caller_job_title_applies_to_fallback() {
        let result = handle_extraction("not json", Some("QA Engineer"));
        assert!(result.parse_failed);
        assert_eq!(result.record.job_title.as_deref(), Some("QA Engineer"));
    }

    #[test]
    fn test_model_job_title_is_ignored() {
        let raw = r#"{ "name": "Ada", "job_title": "CTO" }"#;
        assert!(handle_extraction(raw, None).record.job_title.is_none());
        assert_eq!(
            handle_extraction(raw, Some("Analyst")).record.job_title.as_deref(),
            Some("Analyst")
        );
    }

    #[test]
    fn test_empty_caller_job_title_clears_title() {
        let raw = r#"{ "name": "Ada", "job_title": "CTO" }"#;
        assert!(handle_extraction(raw, Some("")).record.job_title.is_none());
    }

    #[test]
    fn test_incomplete_only_when_name_and_email_missing() {
        let name_only = handle_extraction(r#"{ "name": "Ada" }"#, None);
        assert!(!name_only.incomplete);

        let email_only = handle_extraction(r#"{ "email": "ada@example.com" }"#, None);
        assert!(!email_only.incomplete);

        let neither = handle_extraction(r#"{ "name": "", "skills": ["rust"] }"#, None);
        assert!(neither.incomplete);
        assert!(!neither.parse_failed);
    }
}
