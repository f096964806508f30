//! HTML parsing and data extraction.
//!
//! Turns rendered HTML into the fields of a `CrawlResult`. All parsing is done
//! with CSS selectors via the `scraper` crate; JSON-LD is located with a regex
//! over the raw markup.

mod html;
mod structured;

use scraper::Html;
use url::Url;

use crate::config::{MAX_HTML_LENGTH, REVIEW_WORD_BUDGET};
use crate::models::CrawlResult;
use crate::utils::truncate_chars;

pub use html::{
    count_words, extract_canonical, extract_headings, extract_images, extract_links,
    extract_meta_content, extract_title, extract_visible_text, has_viewport,
};
pub use structured::{extract_json_ld, extract_open_graph};

/// Fills the extracted fields of `result` from `html`.
///
/// `word_count` and `body_text` are set from the parsed body text; the crawler
/// overrides both when the browser reports rendered text. Raw HTML is kept up
/// to `MAX_HTML_LENGTH` characters, after every field has been extracted from
/// the full document.
pub fn populate_from_html(result: &mut CrawlResult, html: &str) {
    let base = Url::parse(&result.url).ok();
    let document = Html::parse_document(html);

    result.title = extract_title(&document);
    result.meta_description = extract_meta_content(&document, "description");
    result.meta_keywords = extract_meta_content(&document, "keywords");
    result.robots_meta = extract_meta_content(&document, "robots");
    result.has_viewport = has_viewport(&document);
    result.canonical_url = extract_canonical(&document, base.as_ref());
    result.open_graph = extract_open_graph(&document);
    result.headings = extract_headings(&document);
    result.images = extract_images(&document);
    result.links = extract_links(&document, base.as_ref());
    set_body_text(result, &extract_visible_text(&document));
    result.structured_data = extract_json_ld(html);
    result.html = truncate_chars(html, MAX_HTML_LENGTH).to_string();
}

/// Sets `word_count` and the word-capped `body_text` from visible page text.
pub fn set_body_text(result: &mut CrawlResult, text: &str) {
    result.word_count = count_words(text);
    result.body_text = text
        .split_whitespace()
        .take(REVIEW_WORD_BUDGET)
        .collect::<Vec<_>>()
        .join(" ");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_populate_from_html() {
        let html = r#"<html lang="en"><head>
            <title>Example Domain</title>
            <meta name="description" content="An example.">
            <meta property="og:type" content="website">
            <script type="application/ld+json">{"@type": "WebSite"}</script>
        </head><body><h1>Example</h1><p>one two three</p>
            <a href="/x">x</a></body></html>"#;
        let mut result = CrawlResult::empty("https://example.com/");
        populate_from_html(&mut result, html);

        assert_eq!(result.title.as_deref(), Some("Example Domain"));
        assert_eq!(result.meta_description.as_deref(), Some("An example."));
        assert_eq!(result.open_graph["og:type"], "website");
        assert_eq!(result.structured_data.len(), 1);
        assert_eq!(result.h1_count(), 1);
        assert_eq!(result.internal_link_count(), 1);
        assert_eq!(result.word_count, 5);
        assert!(!result.has_viewport);
        assert_eq!(result.html, html);
    }

    #[test]
    fn test_html_truncated() {
        let html = format!("<html><body>{}</body></html>", "x".repeat(MAX_HTML_LENGTH));
        let mut result = CrawlResult::empty("https://example.com/");
        populate_from_html(&mut result, &html);
        assert_eq!(result.html.chars().count(), MAX_HTML_LENGTH);
    }

    #[test]
    fn test_body_text_survives_large_head() {
        let script = format!("<script>var blob = \"{}\";</script>", "x".repeat(120_000));
        let html = format!(
            "<html><head><title>Big</title>{script}</head><body><p>{}</p></body></html>",
            "widget ".repeat(500)
        );
        let mut result = CrawlResult::empty("https://example.com/");
        populate_from_html(&mut result, &html);

        assert_eq!(result.html.chars().count(), MAX_HTML_LENGTH);
        assert_eq!(result.word_count, 500);
        assert_eq!(result.body_text.matches("widget").count(), 500);
    }

    #[test]
    fn test_body_text_capped_at_review_words() {
        let mut result = CrawlResult::empty("https://example.com/");
        set_body_text(&mut result, &"lorem ".repeat(REVIEW_WORD_BUDGET + 50));
        assert_eq!(result.word_count, REVIEW_WORD_BUDGET + 50);
        assert_eq!(result.body_text.split_whitespace().count(), REVIEW_WORD_BUDGET);
    }
}
