//! Structured data extraction.
//!
//! - JSON-LD (`<script type="application/ld+json">`), arrays flattened
//! - Open Graph meta tags (`og:*`)

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};

use crate::utils::{compile_regex_unsafe, parse_selector_unsafe};

static JSON_LD_RE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(
        r#"(?is)<script[^>]*type\s*=\s*["']application/ld\+json["'][^>]*>(.*?)</script>"#,
        "JSON_LD_RE",
    )
});

static OPEN_GRAPH_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe(r#"meta[property^="og:"]"#, "OPEN_GRAPH_SELECTOR"));

/// Extracts every JSON-LD block from raw HTML.
///
/// Blocks holding a top-level array contribute each element. Blocks that are
/// not valid JSON are skipped.
pub fn extract_json_ld(html: &str) -> Vec<serde_json::Value> {
    let mut blocks = Vec::new();
    for cap in JSON_LD_RE.captures_iter(html) {
        let Some(content) = cap.get(1) else {
            continue;
        };
        match serde_json::from_str::<serde_json::Value>(content.as_str().trim()) {
            Ok(serde_json::Value::Array(items)) => blocks.extend(items),
            Ok(value) => blocks.push(value),
            Err(e) => log::debug!("Skipping malformed JSON-LD block: {e}"),
        }
    }
    blocks
}

/// Extracts Open Graph properties. The first occurrence of a property wins.
pub fn extract_open_graph(document: &Html) -> BTreeMap<String, String> {
    let mut tags = BTreeMap::new();
    for element in document.select(&OPEN_GRAPH_SELECTOR) {
        if let (Some(property), Some(content)) = (
            element.value().attr("property"),
            element.value().attr("content"),
        ) {
            tags.entry(property.trim().to_string())
                .or_insert_with(|| content.trim().to_string());
        }
    }
    tags
}
