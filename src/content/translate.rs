//! Batch issue translation prompt and response handling.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::json::extract_array;
use crate::models::Issue;

/// The translatable text of one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct IssueText {
    pub title: String,
    pub description: String,
    pub recommendation: String,
}

impl From<&Issue> for IssueText {
    fn from(issue: &Issue) -> Self {
        Self {
            title: issue.title.clone(),
            description: issue.description.clone(),
            recommendation: issue.recommendation.clone(),
        }
    }
}

/// Unique issue texts by title, in first-seen order.
pub(super) fn unique_by_title(issues: &[Issue]) -> Vec<IssueText> {
    let mut seen = std::collections::HashSet::new();
    issues
        .iter()
        .filter(|issue| seen.insert(issue.title.as_str()))
        .map(IssueText::from)
        .collect()
}

pub(super) fn build_prompt(unique: &[IssueText], language: &str) -> String {
    let payload = serde_json::to_string_pretty(unique).unwrap_or_default();
    format!(
        "Translate the text fields of the following SEO audit issues into the language with code \"{language}\".\n\
         Keep technical terms such as HTML tag names, H1 and Open Graph unchanged.\n\
         Return only a JSON array with exactly {} objects in the same order, each with the keys \
         \"title\", \"description\" and \"recommendation\".\n\n{payload}",
        unique.len()
    )
}

/// Parses the translated array. Fails unless it has the same length as the
/// request and every entry carries all three non-empty fields.
pub(super) fn parse_translations(text: &str, expected: usize) -> Result<Vec<IssueText>, String> {
    let items = extract_array(text).ok_or("response contains no JSON array")?;
    if items.len() != expected {
        return Err(format!(
            "expected {expected} translations, got {}",
            items.len()
        ));
    }
    let translations: Vec<IssueText> = items
        .into_iter()
        .map(serde_json::from_value)
        .collect::<Result<_, _>>()
        .map_err(|e| format!("malformed translation entry: {e}"))?;
    if translations
        .iter()
        .any(|t| t.title.trim().is_empty() || t.description.trim().is_empty())
    {
        return Err("translation entry with empty text".to_string());
    }
    Ok(translations)
}

/// Rewrites every issue whose title was translated. Returns how many issues
/// changed.
pub(super) fn apply(issues: &mut [Issue], originals: &[IssueText], translations: Vec<IssueText>) -> usize {
    let by_title: HashMap<&str, IssueText> = originals
        .iter()
        .map(|original| original.title.as_str())
        .zip(translations)
        .collect();

    let mut changed = 0;
    for issue in issues.iter_mut() {
        if let Some(translated) = by_title.get(issue.title.as_str()) {
            issue.title = translated.title.clone();
            issue.description = translated.description.clone();
            issue.recommendation = translated.recommendation.clone();
            changed += 1;
        }
    }
    changed
}
