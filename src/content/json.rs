//! Tolerant JSON extraction from model output.
//!
//! Models wrap JSON in prose or code fences; the outermost object or array is
//! cut out before parsing.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::compile_regex_unsafe;

static OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex_unsafe(r"(?s)\{.*\}", "OBJECT_RE"));
static ARRAY_RE: LazyLock<Regex> = LazyLock::new(|| compile_regex_unsafe(r"(?s)\[.*\]", "ARRAY_RE"));

/// Parses the span from the first `{` to the last `}`.
pub(super) fn extract_object(text: &str) -> Option<serde_json::Map<String, serde_json::Value>> {
    let span = OBJECT_RE.find(text)?;
    match serde_json::from_str(span.as_str()) {
        Ok(serde_json::Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Parses the span from the first `[` to the last `]`.
pub(super) fn extract_array(text: &str) -> Option<Vec<serde_json::Value>> {
    let span = ARRAY_RE.find(text)?;
    match serde_json::from_str(span.as_str()) {
        Ok(serde_json::Value::Array(items)) => Some(items),
        _ => None,
    }
}
