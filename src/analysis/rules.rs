//! Individual on-page rules. Each rule inspects one aspect of a crawl and
//! yields at most one issue.
//!
//! Titles are fixed strings: reporting deduplicates issues by title, so
//! page-specific numbers go into the description.

use crate::config::{
    META_DESCRIPTION_MAX_CHARS, META_DESCRIPTION_MIN_CHARS, SLOW_LOAD_MS, THIN_CONTENT_WORDS,
    TITLE_MAX_CHARS, TITLE_MIN_CHARS,
};
use crate::models::{CrawlResult, Issue, IssueCategory};

/// Open Graph properties every shareable page should carry.
const REQUIRED_OPEN_GRAPH: &[&str] = &["og:title", "og:description", "og:image"];

pub(super) fn title(crawl: &CrawlResult) -> Option<Issue> {
    let Some(title) = crawl.title.as_deref() else {
        return Some(Issue::critical(
            IssueCategory::Meta,
            "Missing page title",
            "The page has no <title> element.",
            "Add a unique, descriptive title between 30 and 60 characters.",
        ));
    };
    let length = title.chars().count();
    if length < TITLE_MIN_CHARS {
        Some(Issue::warning(
            IssueCategory::Meta,
            "Title too short",
            format!("The title is {length} characters long (minimum {TITLE_MIN_CHARS})."),
            "Expand the title with the page's primary keyword and a clear value proposition.",
        ))
    } else if length > TITLE_MAX_CHARS {
        Some(Issue::warning(
            IssueCategory::Meta,
            "Title too long",
            format!(
                "The title is {length} characters long (maximum {TITLE_MAX_CHARS}) and may be truncated in search results."
            ),
            "Shorten the title and move the most important words to the front.",
        ))
    } else {
        None
    }
}

pub(super) fn meta_description(crawl: &CrawlResult) -> Option<Issue> {
    let Some(description) = crawl.meta_description.as_deref() else {
        return Some(Issue::critical(
            IssueCategory::Meta,
            "Missing meta description",
            "The page has no meta description.",
            "Add a meta description between 120 and 160 characters summarizing the page.",
        ));
    };
    let length = description.chars().count();
    if length < META_DESCRIPTION_MIN_CHARS {
        Some(Issue::warning(
            IssueCategory::Meta,
            "Meta description too short",
            format!(
                "The meta description is {length} characters long (minimum {META_DESCRIPTION_MIN_CHARS})."
            ),
            "Write a fuller description that gives searchers a reason to click.",
        ))
    } else if length > META_DESCRIPTION_MAX_CHARS {
        Some(Issue::warning(
            IssueCategory::Meta,
            "Meta description too long",
            format!(
                "The meta description is {length} characters long (maximum {META_DESCRIPTION_MAX_CHARS}) and may be truncated."
            ),
            "Trim the description so the key message fits within 160 characters.",
        ))
    } else {
        None
    }
}

pub(super) fn h1(crawl: &CrawlResult) -> Option<Issue> {
    match crawl.h1_count() {
        0 => Some(Issue::critical(
            IssueCategory::Content,
            "Missing H1 heading",
            "The page has no <h1> element.",
            "Add a single H1 that states the page's main topic.",
        )),
        1 => None,
        count => Some(Issue::warning(
            IssueCategory::Content,
            "Multiple H1 headings",
            format!("The page has {count} <h1> elements."),
            "Keep one H1 per page and demote the others to H2.",
        )),
    }
}

/// Reports the first place where the heading level jumps by more than one.
pub(super) fn heading_hierarchy(crawl: &CrawlResult) -> Option<Issue> {
    crawl.headings.windows(2).find_map(|pair| {
        let (previous, next) = (pair[0].level, pair[1].level);
        (next > previous + 1).then(|| {
            Issue::info(
                IssueCategory::Content,
                "Skipped heading level",
                format!("The heading structure jumps from H{previous} to H{next}."),
                "Use heading levels in order so the outline stays navigable.",
            )
        })
    })
}

pub(super) fn image_alt(crawl: &CrawlResult) -> Option<Issue> {
    let missing = crawl.images.iter().filter(|image| !image.has_alt).count();
    (missing > 0).then(|| {
        Issue::warning(
            IssueCategory::Accessibility,
            "Images missing alt text",
            format!(
                "{missing} of {} images have no meaningful alt text.",
                crawl.images.len()
            ),
            "Describe each informative image in its alt attribute; use alt=\"\" only for decorative images.",
        )
    })
}

pub(super) fn viewport(crawl: &CrawlResult) -> Option<Issue> {
    (!crawl.has_viewport).then(|| {
        Issue::critical(
            IssueCategory::Mobile,
            "Missing viewport meta tag",
            "Without a viewport declaration the page renders at desktop width on phones.",
            "Add <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">.",
        )
    })
}

pub(super) fn canonical(crawl: &CrawlResult) -> Option<Issue> {
    crawl.canonical_url.is_none().then(|| {
        Issue::warning(
            IssueCategory::Meta,
            "Missing canonical URL",
            "The page does not declare a canonical link.",
            "Add <link rel=\"canonical\"> pointing to the preferred URL of this page.",
        )
    })
}

pub(super) fn open_graph(crawl: &CrawlResult) -> Option<Issue> {
    let missing: Vec<&str> = REQUIRED_OPEN_GRAPH
        .iter()
        .copied()
        .filter(|property| !crawl.open_graph.contains_key(*property))
        .collect();
    (!missing.is_empty()).then(|| {
        Issue::info(
            IssueCategory::Meta,
            "Incomplete Open Graph tags",
            format!("Missing Open Graph properties: {}.", missing.join(", ")),
            "Add og:title, og:description and og:image so shared links render a rich preview.",
        )
    })
}

pub(super) fn thin_content(crawl: &CrawlResult) -> Option<Issue> {
    (crawl.word_count < THIN_CONTENT_WORDS).then(|| {
        Issue::warning(
            IssueCategory::Content,
            "Thin content",
            format!(
                "The page has {} words of visible text (recommended at least {THIN_CONTENT_WORDS}).",
                crawl.word_count
            ),
            "Expand the page with substantive, original content that answers the visitor's question.",
        )
    })
}

pub(super) fn http_status(crawl: &CrawlResult) -> Option<Issue> {
    match crawl.status_code {
        status @ 400.. => Some(Issue::critical(
            IssueCategory::Technical,
            "HTTP error status",
            format!("The page responded with HTTP {status}."),
            "Fix the error or redirect the URL to a working page.",
        )),
        status @ 300..=399 => Some(Issue::info(
            IssueCategory::Technical,
            "Redirect response",
            format!("The page responded with HTTP {status}."),
            "Link directly to the final URL to avoid the extra round trip.",
        )),
        _ => None,
    }
}

pub(super) fn load_time(crawl: &CrawlResult) -> Option<Issue> {
    (crawl.load_time_ms > SLOW_LOAD_MS).then(|| {
        Issue::warning(
            IssueCategory::Performance,
            "Slow page load",
            format!(
                "The page took {} ms to load (threshold {SLOW_LOAD_MS} ms).",
                crawl.load_time_ms
            ),
            "Reduce render-blocking resources, compress images and enable caching.",
        )
    })
}

pub(super) fn structured_data(crawl: &CrawlResult) -> Option<Issue> {
    crawl.structured_data.is_empty().then(|| {
        Issue::info(
            IssueCategory::Technical,
            "No structured data",
            "The page has no JSON-LD structured data.",
            "Add Schema.org markup (e.g. Organization, Article, Product) as JSON-LD.",
        )
    })
}

pub(super) fn internal_links(crawl: &CrawlResult) -> Option<Issue> {
    (!crawl.links.is_empty() && crawl.internal_link_count() == 0).then(|| {
        Issue::warning(
            IssueCategory::Technical,
            "No internal links",
            format!(
                "All {} links on the page point to other sites.",
                crawl.links.len()
            ),
            "Link to related pages on your own site to help crawlers and visitors.",
        )
    })
}

pub(super) fn noindex(crawl: &CrawlResult) -> Option<Issue> {
    let robots = crawl.robots_meta.as_deref()?;
    robots.to_lowercase().contains("noindex").then(|| {
        Issue::critical(
            IssueCategory::Technical,
            "Page blocked from indexing",
            format!("The robots meta tag contains \"{robots}\"."),
            "Remove noindex if this page should appear in search results.",
        )
    })
}
