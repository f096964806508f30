//! LLM-backed content review, issue translation and executive narrative.
//!
//! Every call goes through a `TextGenerator` under its own deadline. Nothing
//! here can fail an audit: a missing generator, a timeout or unparseable model
//! output degrades to `ToolOutcome::Unavailable` (or the deterministic
//! fallback summary).

mod json;
mod llm;
mod review;
mod summary;
mod translate;

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};

use crate::config::{
    CONTENT_REVIEW_TIMEOUT, DEFAULT_LANGUAGE, LLM_MAX_TOKENS, SUMMARY_TIMEOUT,
    TRANSLATION_MAX_TOKENS, TRANSLATION_TIMEOUT,
};
use crate::models::{ContentReview, CrawlResult, Issue, ToolOutcome, UrlResult};

pub use llm::{OpenAiCompatibleClient, TextGenerator};
pub use summary::fallback_summary;

/// Per-call deadlines.
#[derive(Debug, Clone, Copy)]
pub struct ReviewerTimeouts {
    pub review: Duration,
    pub translation: Duration,
    pub summary: Duration,
}

impl Default for ReviewerTimeouts {
    fn default() -> Self {
        Self {
            review: CONTENT_REVIEW_TIMEOUT,
            translation: TRANSLATION_TIMEOUT,
            summary: SUMMARY_TIMEOUT,
        }
    }
}

#[derive(Clone)]
pub struct ContentReviewer {
    generator: Option<Arc<dyn TextGenerator>>,
    timeouts: ReviewerTimeouts,
}

impl ContentReviewer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
            timeouts: ReviewerTimeouts::default(),
        }
    }

    /// A reviewer with no generator: reviews and translations are
    /// `Unavailable` and summaries use the fallback.
    pub fn disabled() -> Self {
        Self {
            generator: None,
            timeouts: ReviewerTimeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: ReviewerTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    async fn call(
        &self,
        what: &str,
        prompt: &str,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<String, String> {
        let Some(generator) = &self.generator else {
            return Err("no text generator configured".to_string());
        };
        match tokio::time::timeout(timeout, generator.generate(prompt, max_tokens)).await {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => {
                warn!("{what} failed: {e:#}");
                Err(format!("{e:#}"))
            }
            Err(_) => {
                warn!("{what} timed out after {}s", timeout.as_secs());
                Err(format!("timed out after {}s", timeout.as_secs()))
            }
        }
    }

    /// Reviews one crawled page. Scores are clamped to [1, 10].
    pub async fn review(&self, crawl: &CrawlResult, language: &str) -> ToolOutcome<ContentReview> {
        let prompt = review::build_prompt(crawl, language);
        let what = format!("Content review for {}", crawl.url);
        let text = match self
            .call(&what, &prompt, LLM_MAX_TOKENS, self.timeouts.review)
            .await
        {
            Ok(text) => text,
            Err(reason) => return ToolOutcome::Unavailable(reason),
        };
        match review::parse_review(&text) {
            Some(review) => {
                debug!(
                    "{what}: quality {}, readability {}, keywords {}",
                    review.content_quality, review.readability, review.keyword_optimization
                );
                ToolOutcome::Ready(review)
            }
            None => {
                warn!("{what}: response did not contain a usable review");
                ToolOutcome::unavailable("unparseable review response")
            }
        }
    }

    /// Translates issue text into `language` with one batch call.
    ///
    /// All-or-nothing: on any failure no issue is modified. Issues sharing a
    /// title share one translation. Returns the number of issues rewritten.
    pub async fn translate_issues(&self, issues: &mut [Issue], language: &str) -> ToolOutcome<usize> {
        if issues.is_empty() || language.eq_ignore_ascii_case(DEFAULT_LANGUAGE) {
            return ToolOutcome::Ready(0);
        }

        let unique = translate::unique_by_title(issues);
        let prompt = translate::build_prompt(&unique, language);
        let text = match self
            .call(
                "Issue translation",
                &prompt,
                TRANSLATION_MAX_TOKENS,
                self.timeouts.translation,
            )
            .await
        {
            Ok(text) => text,
            Err(reason) => return ToolOutcome::Unavailable(reason),
        };

        match translate::parse_translations(&text, unique.len()) {
            Ok(translations) => {
                let changed = translate::apply(issues, &unique, translations);
                info!(
                    "Translated {} unique issue(s) into {language} ({changed} issue(s) updated)",
                    unique.len()
                );
                ToolOutcome::Ready(changed)
            }
            Err(reason) => {
                warn!("Issue translation discarded: {reason}");
                ToolOutcome::Unavailable(reason)
            }
        }
    }

    /// Writes the executive narrative, falling back to a count-based summary.
    pub async fn summarize(&self, results: &[UrlResult], issues: &[Issue], language: &str) -> String {
        if self.generator.is_none() {
            return fallback_summary(results, issues);
        }
        let prompt = summary::build_prompt(results, issues, language);
        match self
            .call(
                "Executive summary",
                &prompt,
                LLM_MAX_TOKENS,
                self.timeouts.summary,
            )
            .await
        {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => {
                warn!("Executive summary was empty, using fallback");
                fallback_summary(results, issues)
            }
            Err(_) => fallback_summary(results, issues),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use crate::models::IssueCategory;

    /// Replies with a fixed text and counts calls.
    struct Canned {
        reply: anyhow::Result<String>,
        calls: AtomicUsize,
    }

    impl Canned {
        fn ok(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(anyhow::anyhow!("upstream 500")),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, _prompt: &str, _max_tokens: u32) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }
    }

    struct Hanging;

    #[async_trait]
    impl TextGenerator for Hanging {
        async fn generate(&self, _prompt: &str, _max_tokens: u32) -> anyhow::Result<String> {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(String::new())
        }
    }

    fn issues() -> Vec<Issue> {
        vec![
            Issue::critical(IssueCategory::Meta, "Missing page title", "No title.", "Add a title."),
            Issue::warning(IssueCategory::Content, "Thin content", "120 words.", "Write more."),
        ]
    }

    #[tokio::test]
    async fn test_review_success() {
        let generator = Canned::ok(
            r#"```json
            {"content_quality": 8, "readability": 7, "keyword_optimization": 5,
             "recommendations": ["Add FAQ"], "summary": "Good."}
            ```"#,
        );
        let reviewer = ContentReviewer::new(generator.clone());
        let crawl = CrawlResult::empty("https://example.com/");
        let review = reviewer.review(&crawl, "en").await.into_option().unwrap();
        assert_eq!(review.content_quality, 8);
        assert_eq!(review.recommendations, vec!["Add FAQ"]);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_review_unparseable_is_unavailable() {
        let reviewer = ContentReviewer::new(Canned::ok("I cannot help with that."));
        let outcome = reviewer
            .review(&CrawlResult::empty("https://example.com/"), "en")
            .await;
        assert!(!outcome.is_ready());
    }

    #[tokio::test]
    async fn test_review_timeout() {
        let reviewer = ContentReviewer::new(Arc::new(Hanging)).with_timeouts(ReviewerTimeouts {
            review: Duration::from_millis(50),
            ..Default::default()
        });
        let outcome = reviewer
            .review(&CrawlResult::empty("https://example.com/"), "en")
            .await;
        assert_eq!(outcome.reason(), Some("timed out after 0s"));
    }

    #[tokio::test]
    async fn test_disabled_reviewer() {
        let reviewer = ContentReviewer::disabled();
        let outcome = reviewer
            .review(&CrawlResult::empty("https://example.com/"), "en")
            .await;
        assert_eq!(outcome.reason(), Some("no text generator configured"));
    }

    #[tokio::test]
    async fn test_translation_skipped_for_default_language() {
        let generator = Canned::ok("[]");
        let reviewer = ContentReviewer::new(generator.clone());
        let mut issues = issues();
        let outcome = reviewer.translate_issues(&mut issues, "EN").await;
        assert_eq!(outcome, ToolOutcome::Ready(0));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(issues, self::issues());
    }

    #[tokio::test]
    async fn test_translation_applies() {
        let reply = r#"[
            {"title": "Titre manquant", "description": "Pas de titre.", "recommendation": "Ajoutez un titre."},
            {"title": "Contenu léger", "description": "120 mots.", "recommendation": "Écrivez plus."}
        ]"#;
        let reviewer = ContentReviewer::new(Canned::ok(reply));
        let mut issues = issues();
        let outcome = reviewer.translate_issues(&mut issues, "fr").await;
        assert_eq!(outcome, ToolOutcome::Ready(2));
        assert_eq!(issues[0].title, "Titre manquant");
        assert_eq!(issues[1].recommendation, "Écrivez plus.");
        assert_eq!(issues[1].category, IssueCategory::Content);
    }

    #[tokio::test]
    async fn test_translation_mismatch_leaves_issues_untouched() {
        let reply = r#"[{"title": "Titre manquant", "description": "Pas de titre.", "recommendation": "Ajoutez un titre."}]"#;
        let reviewer = ContentReviewer::new(Canned::ok(reply));
        let mut issues = issues();
        let outcome = reviewer.translate_issues(&mut issues, "fr").await;
        assert!(!outcome.is_ready());
        assert_eq!(issues, self::issues());
    }

    #[tokio::test]
    async fn test_translation_failure_leaves_issues_untouched() {
        let reviewer = ContentReviewer::new(Canned::failing());
        let mut issues = issues();
        assert!(!reviewer.translate_issues(&mut issues, "de").await.is_ready());
        assert_eq!(issues, self::issues());
    }

    #[tokio::test]
    async fn test_summary_falls_back() {
        let results = vec![UrlResult::pending("https://example.com/")];
        let issues = issues();
        let expected = fallback_summary(&results, &issues);

        let failing = ContentReviewer::new(Canned::failing());
        assert_eq!(failing.summarize(&results, &issues, "en").await, expected);

        let blank = ContentReviewer::new(Canned::ok("   "));
        assert_eq!(blank.summarize(&results, &issues, "en").await, expected);

        let disabled = ContentReviewer::disabled();
        assert_eq!(disabled.summarize(&results, &issues, "en").await, expected);
    }

    #[tokio::test]
    async fn test_summary_uses_generator() {
        let reviewer = ContentReviewer::new(Canned::ok("  The site is in decent shape.\n"));
        let summary = reviewer
            .summarize(&[UrlResult::pending("https://example.com/")], &issues(), "en")
            .await;
        assert_eq!(summary, "The site is in decent shape.");
    }
}
