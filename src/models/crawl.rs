//! Crawl output.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A heading element in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// 1 for `<h1>` through 6 for `<h6>`
    pub level: u8,
    pub text: String,
}

/// An `<img>` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub src: String,
    pub alt: Option<String>,
    /// True when the alt attribute carries non-whitespace text
    pub has_alt: bool,
}

/// An `<a href>` element resolved against the page URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkInfo {
    pub href: String,
    pub text: String,
    /// True when the link leaves the page's origin
    pub is_external: bool,
}

/// Everything extracted from one rendered page. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlResult {
    pub url: String,
    /// HTTP status of the main document, 0 when navigation failed
    pub status_code: u16,
    pub load_time_ms: u64,
    /// Rendered HTML, truncated to `MAX_HTML_LENGTH` characters
    pub html: String,
    pub title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub canonical_url: Option<String>,
    pub open_graph: BTreeMap<String, String>,
    pub headings: Vec<Heading>,
    pub images: Vec<ImageInfo>,
    pub links: Vec<LinkInfo>,
    pub word_count: usize,
    /// Visible body text, cut to `REVIEW_WORD_BUDGET` words
    #[serde(default)]
    pub body_text: String,
    pub robots_meta: Option<String>,
    pub has_viewport: bool,
    pub structured_data: Vec<serde_json::Value>,
    pub desktop_screenshot: Option<PathBuf>,
    pub mobile_screenshot: Option<PathBuf>,
}

impl CrawlResult {
    /// An empty result for `url`, used as the base the extractor fills in.
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status_code: 0,
            load_time_ms: 0,
            html: String::new(),
            title: None,
            meta_description: None,
            meta_keywords: None,
            canonical_url: None,
            open_graph: BTreeMap::new(),
            headings: Vec::new(),
            images: Vec::new(),
            links: Vec::new(),
            word_count: 0,
            body_text: String::new(),
            robots_meta: None,
            has_viewport: false,
            structured_data: Vec::new(),
            desktop_screenshot: None,
            mobile_screenshot: None,
        }
    }

    pub fn h1_count(&self) -> usize {
        self.headings.iter().filter(|h| h.level == 1).count()
    }

    pub fn internal_link_count(&self) -> usize {
        self.links.iter().filter(|l| !l.is_external).count()
    }
}
