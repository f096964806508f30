//! Single-page content review prompt and response parsing.

use std::fmt::Write;

use super::json::extract_object;
use crate::config::{MAX_REVIEW_RECOMMENDATIONS, REVIEW_WORD_BUDGET};
use crate::models::{ContentReview, CrawlResult};

/// Builds the review prompt: page metadata, the heading outline and at most
/// `REVIEW_WORD_BUDGET` words of body text.
pub(super) fn build_prompt(crawl: &CrawlResult, language: &str) -> String {
    let body: Vec<&str> = crawl
        .body_text
        .split_whitespace()
        .take(REVIEW_WORD_BUDGET)
        .collect();

    let mut prompt = String::new();
    let _ = writeln!(
        prompt,
        "You are an SEO content analyst. Review the following web page and respond in the language with code \"{language}\"."
    );
    let _ = writeln!(prompt, "\nURL: {}", crawl.url);
    let _ = writeln!(prompt, "Title: {}", crawl.title.as_deref().unwrap_or("(none)"));
    let _ = writeln!(
        prompt,
        "Meta description: {}",
        crawl.meta_description.as_deref().unwrap_or("(none)")
    );
    let _ = writeln!(prompt, "\nHeadings:");
    for heading in &crawl.headings {
        let _ = writeln!(prompt, "H{}: {}", heading.level, heading.text);
    }
    let _ = writeln!(prompt, "\nBody text:\n{}", body.join(" "));
    let _ = writeln!(
        prompt,
        "\nReturn only a JSON object with these keys:\n\
         \"content_quality\": integer 1-10,\n\
         \"readability\": integer 1-10,\n\
         \"keyword_optimization\": integer 1-10,\n\
         \"recommendations\": array of at most {MAX_REVIEW_RECOMMENDATIONS} short actionable strings,\n\
         \"summary\": two or three sentences assessing the content."
    );
    prompt
}

/// Reads a score, rounding fractions and clamping into [1, 10].
fn score(map: &serde_json::Map<String, serde_json::Value>, key: &str) -> Option<u8> {
    let value = map.get(key)?;
    let number = value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<f64>().ok()))?;
    number
        .is_finite()
        .then(|| number.round().clamp(1.0, 10.0) as u8)
}

/// Parses a review out of model output. Any missing score makes the whole
/// review unusable.
pub(super) fn parse_review(text: &str) -> Option<ContentReview> {
    let map = extract_object(text)?;

    let recommendations = map
        .get("recommendations")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .take(MAX_REVIEW_RECOMMENDATIONS)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Some(ContentReview {
        content_quality: score(&map, "content_quality")?,
        readability: score(&map, "readability")?,
        keyword_optimization: score(&map, "keyword_optimization")?,
        recommendations,
        summary: map
            .get("summary")
            .and_then(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    })
}
