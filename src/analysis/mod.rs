//! Rule-based on-page analysis.
//!
//! `analyze` is a pure function over a `CrawlResult`: no I/O, deterministic,
//! every rule evaluated independently. Length and count thresholds are strict
//! (a 30-character title or exactly 300 words does not fire).

mod rules;

use crate::models::{CrawlResult, Issue};

type Rule = fn(&CrawlResult) -> Option<Issue>;

/// Rules in reporting order.
const RULES: &[Rule] = &[
    rules::title,
    rules::meta_description,
    rules::h1,
    rules::heading_hierarchy,
    rules::image_alt,
    rules::viewport,
    rules::canonical,
    rules::open_graph,
    rules::thin_content,
    rules::http_status,
    rules::load_time,
    rules::structured_data,
    rules::internal_links,
    rules::noindex,
];

/// Runs every rule against `crawl`.
pub fn analyze(crawl: &CrawlResult) -> Vec<Issue> {
    RULES.iter().filter_map(|rule| rule(crawl)).collect()
}
