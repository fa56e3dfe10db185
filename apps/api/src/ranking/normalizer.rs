//! Skill normalization: turns free-text skill tokens into comparable keys.

use serde_json::Value;

/// Coerces an arbitrary JSON value into a list of strings.
///
/// Non-arrays yield an empty list. Strings are kept verbatim, `null` becomes `""` and any
/// other element becomes its JSON text (`42` → `"42"`).
pub fn coerce_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Trims and lower-cases every skill, dropping the ones left empty.
/// Order is preserved; duplicates are kept.
pub fn normalize_skills<S: AsRef<str>>(skills: &[S]) -> Vec<String> {
    skills
        .iter()
        .map(|s| s.as_ref().trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// [`normalize_skills`] over an untyped value. Never fails.
pub fn normalize_skill_value(value: &Value) -> Vec<String> {
    normalize_skills(&coerce_string_list(value))
}
