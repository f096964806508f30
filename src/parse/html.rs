//! Element extraction from rendered HTML.
//!
//! Extracts the on-page signals the rule analyzer inspects:
//! - Title, meta description, meta keywords, robots directives, viewport
//! - Canonical link
//! - Headings in document order
//! - Images with their alt text
//! - Links, resolved against the page URL and classified internal/external
//! - Visible body text for word counting

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::models::{Heading, ImageInfo, LinkInfo};
use crate::utils::parse_selector_unsafe;

static TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("title", "TITLE_SELECTOR"));
static META_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("meta[name]", "META_SELECTOR"));
static CANONICAL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("link[rel][href]", "CANONICAL_SELECTOR"));
static HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("h1, h2, h3, h4, h5, h6", "HEADING_SELECTOR"));
static IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("img", "IMAGE_SELECTOR"));
static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("a[href]", "ANCHOR_SELECTOR"));
static BODY_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| parse_selector_unsafe("body", "BODY_SELECTOR"));

/// Elements whose text never renders.
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Collapses runs of whitespace and trims; `None` when nothing remains.
fn normalize_text(raw: &str) -> Option<String> {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

fn element_text(element: &ElementRef) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// Returns the first `<title>` text, whitespace-collapsed.
pub fn extract_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .and_then(|element| normalize_text(&element_text(&element)))
}

/// Returns the `content` of the first `<meta name=...>` matching `name`
/// case-insensitively.
pub fn extract_meta_content(document: &Html, name: &str) -> Option<String> {
    document
        .select(&META_SELECTOR)
        .find(|element| {
            element
                .value()
                .attr("name")
                .is_some_and(|n| n.trim().eq_ignore_ascii_case(name))
        })
        .and_then(|element| element.value().attr("content"))
        .and_then(normalize_text)
}

/// Returns the canonical URL, resolved against `base` when relative.
pub fn extract_canonical(document: &Html, base: Option<&Url>) -> Option<String> {
    let href = document
        .select(&CANONICAL_SELECTOR)
        .find(|element| {
            element
                .value()
                .attr("rel")
                .is_some_and(|rel| rel.split_whitespace().any(|r| r.eq_ignore_ascii_case("canonical")))
        })
        .and_then(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())?;

    match base.and_then(|base| base.join(href).ok()) {
        Some(resolved) => Some(resolved.to_string()),
        None => Some(href.to_string()),
    }
}

/// True when the page declares a `<meta name="viewport">` with content.
pub fn has_viewport(document: &Html) -> bool {
    extract_meta_content(document, "viewport").is_some()
}

/// Returns all headings in document order. Empty headings are kept with empty
/// text so level sequencing stays intact.
pub fn extract_headings(document: &Html) -> Vec<Heading> {
    document
        .select(&HEADING_SELECTOR)
        .filter_map(|element| {
            let level = element
                .value()
                .name()
                .strip_prefix('h')
                .and_then(|n| n.parse::<u8>().ok())?;
            Some(Heading {
                level,
                text: normalize_text(&element_text(&element)).unwrap_or_default(),
            })
        })
        .collect()
}

/// Returns every `<img>`, with `has_alt` true only for non-blank alt text.
pub fn extract_images(document: &Html) -> Vec<ImageInfo> {
    document
        .select(&IMAGE_SELECTOR)
        .map(|element| {
            let alt = element.value().attr("alt").map(str::to_string);
            let has_alt = alt.as_deref().is_some_and(|a| !a.trim().is_empty());
            ImageInfo {
                src: element.value().attr("src").unwrap_or_default().trim().to_string(),
                alt,
                has_alt,
            }
        })
        .collect()
}

/// Returns HTTP(S) links resolved against `base`.
///
/// Fragment-only, `javascript:`, `mailto:` and `tel:` links are skipped. A link
/// is external when its origin differs from the page's origin.
pub fn extract_links(document: &Html, base: Option<&Url>) -> Vec<LinkInfo> {
    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| {
            let href = element.value().attr("href")?.trim();
            if href.is_empty() || href.starts_with('#') {
                return None;
            }
            let resolved = match base {
                Some(base) => base.join(href).ok()?,
                None => Url::parse(href).ok()?,
            };
            if !matches!(resolved.scheme(), "http" | "https") {
                return None;
            }
            let is_external = base.is_none_or(|base| base.origin() != resolved.origin());
            Some(LinkInfo {
                href: resolved.to_string(),
                text: normalize_text(&element_text(&element)).unwrap_or_default(),
                is_external,
            })
        })
        .collect()
}

/// Returns the rendered-looking text of `<body>`: text nodes outside scripts,
/// styles and templates, whitespace-collapsed.
pub fn extract_visible_text(document: &Html) -> String {
    let Some(body) = document.select(&BODY_SELECTOR).next() else {
        return String::new();
    };
    let mut words: Vec<&str> = Vec::new();
    for node in body.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| INVISIBLE_ELEMENTS.contains(&e.name()))
        });
        if !hidden {
            words.extend(text.split_whitespace());
        }
    }
    words.join(" ")
}

/// Counts whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<!DOCTYPE html>
<html>
<head>
  <title>
    Widgets  &amp; Gadgets
  </title>
  <meta name="Description" content="  All the widgets you need. ">
  <meta name="keywords" content="widgets, gadgets">
  <meta name="robots" content="noindex, follow">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <link rel="canonical" href="/products">
  <script>var hidden = "do not count me";</script>
</head>
<body>
  <h1>Main</h1>
  <h3>Skipped</h3>
  <h2></h2>
  <p>Four words of text.</p>
  <style>.x { color: red; }</style>
  <img src="/a.png" alt="A widget">
  <img src="/b.png" alt="   ">
  <img src="/c.png">
  <a href="/about">About  us</a>
  <a href="https://example.com/contact">Contact</a>
  <a href="https://other.example/">Elsewhere</a>
  <a href="#top">Top</a>
  <a href="mailto:hi@example.com">Mail</a>
  <a href="javascript:void(0)">Nothing</a>
  <noscript>Enable JS please</noscript>
</body>
</html>"##;

    fn parsed() -> (Html, Url) {
        (
            Html::parse_document(PAGE),
            Url::parse("https://example.com/products?ref=1").unwrap(),
        )
    }

    #[test]
    fn test_title_and_meta() {
        let (doc, _) = parsed();
        assert_eq!(extract_title(&doc).as_deref(), Some("Widgets & Gadgets"));
        assert_eq!(
            extract_meta_content(&doc, "description").as_deref(),
            Some("All the widgets you need.")
        );
        assert_eq!(
            extract_meta_content(&doc, "robots").as_deref(),
            Some("noindex, follow")
        );
        assert!(has_viewport(&doc));
    }

    #[test]
    fn test_missing_elements() {
        let doc = Html::parse_document("<html><head></head><body></body></html>");
        assert_eq!(extract_title(&doc), None);
        assert_eq!(extract_meta_content(&doc, "description"), None);
        assert_eq!(extract_canonical(&doc, None), None);
        assert!(!has_viewport(&doc));
        assert!(extract_headings(&doc).is_empty());
        assert_eq!(extract_visible_text(&doc), "");
    }

    #[test]
    fn test_blank_title_is_none() {
        let doc = Html::parse_document("<html><head><title>   </title></head></html>");
        assert_eq!(extract_title(&doc), None);
    }

    #[test]
    fn test_canonical_resolved() {
        let (doc, base) = parsed();
        assert_eq!(
            extract_canonical(&doc, Some(&base)).as_deref(),
            Some("https://example.com/products")
        );
    }

    #[test]
    fn test_headings_in_order() {
        let (doc, _) = parsed();
        let headings = extract_headings(&doc);
        let levels: Vec<u8> = headings.iter().map(|h| h.level).collect();
        assert_eq!(levels, vec![1, 3, 2]);
        assert_eq!(headings[2].text, "");
    }

    #[test]
    fn test_images_alt_classification() {
        let (doc, _) = parsed();
        let images = extract_images(&doc);
        assert_eq!(images.len(), 3);
        assert!(images[0].has_alt);
        assert!(!images[1].has_alt);
        assert_eq!(images[1].alt.as_deref(), Some("   "));
        assert!(!images[2].has_alt);
        assert_eq!(images[2].alt, None);
    }

    #[test]
    fn test_links_classified() {
        let (doc, base) = parsed();
        let links = extract_links(&doc, Some(&base));
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].href, "https://example.com/about");
        assert_eq!(links[0].text, "About us");
        assert!(!links[0].is_external);
        assert!(!links[1].is_external);
        assert!(links[2].is_external);
    }

    #[test]
    fn test_visible_text_skips_scripts_and_styles() {
        let (doc, _) = parsed();
        let text = extract_visible_text(&doc);
        assert!(text.contains("Four words of text."));
        assert!(!text.contains("do not count me"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("Enable JS"));
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("  one two\tthree\nfour "), 4);
        assert_eq!(count_words(""), 0);
    }
}
