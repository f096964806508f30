//! Headless-browser crawling.
//!
//! A crawl renders one URL in a desktop context, extracts page data from the
//! rendered DOM and captures a desktop screenshot, then opens a separate
//! mobile context for the mobile screenshot.
//!
//! Navigation failures and screenshot failures degrade the result
//! (`status_code` 0, screenshot path `None`). Only an unopenable desktop
//! context or an unreadable DOM fail the crawl.

mod browser;
#[cfg(feature = "chromium")]
mod chromium;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::config::PAGE_LOAD_TIMEOUT;
use crate::error_handling::{BrowserError, CrawlError};
use crate::models::CrawlResult;
use crate::parse::{populate_from_html, set_body_text};

pub use browser::{Browser, BrowserContext, BrowserLauncher, Viewport};
#[cfg(feature = "chromium")]
pub use chromium::ChromiumLauncher;

/// Rendered text of the body as the user sees it.
const VISIBLE_TEXT_SCRIPT: &str = "document.body ? document.body.innerText : ''";

/// Crawls single URLs through a shared browser.
#[derive(Debug, Clone)]
pub struct Crawler {
    screenshot_dir: PathBuf,
    page_timeout: Duration,
}

impl Crawler {
    pub fn new(screenshot_dir: impl Into<PathBuf>) -> Self {
        Self {
            screenshot_dir: screenshot_dir.into(),
            page_timeout: PAGE_LOAD_TIMEOUT,
        }
    }

    pub fn with_page_timeout(mut self, page_timeout: Duration) -> Self {
        self.page_timeout = page_timeout;
        self
    }

    /// Crawls `url`, writing screenshots to
    /// `{screenshot_dir}/{job_id}/{url_index}-{desktop|mobile}.png`.
    ///
    /// # Errors
    ///
    /// `CrawlError::ContextUnavailable` when the desktop context cannot be
    /// opened, `CrawlError::DomUnavailable` when no DOM can be read.
    pub async fn crawl(
        &self,
        browser: &dyn Browser,
        url: &str,
        job_id: &str,
        url_index: usize,
    ) -> Result<CrawlResult, CrawlError> {
        let desktop = browser
            .new_context(&Viewport::desktop())
            .await
            .map_err(CrawlError::ContextUnavailable)?;

        let outcome = self
            .capture_desktop(desktop.as_ref(), url, job_id, url_index)
            .await;
        if let Err(e) = desktop.close().await {
            debug!("Failed to close desktop context for {url}: {e}");
        }
        let mut result = outcome?;

        result.mobile_screenshot = self.capture_mobile(browser, url, job_id, url_index).await;

        info!(
            "Crawled {url}: status {}, {} ms, {} words",
            result.status_code, result.load_time_ms, result.word_count
        );
        Ok(result)
    }

    async fn capture_desktop(
        &self,
        context: &dyn BrowserContext,
        url: &str,
        job_id: &str,
        url_index: usize,
    ) -> Result<CrawlResult, CrawlError> {
        let mut result = CrawlResult::empty(url);

        let started = Instant::now();
        result.status_code = match self.navigate(context, url).await {
            // A loaded page whose status the backend cannot observe counts as 200
            Ok(status) => status.unwrap_or(200),
            Err(e) => {
                warn!("Navigation to {url} failed, extracting whatever loaded: {e}");
                0
            }
        };
        result.load_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let html = context.content().await.map_err(CrawlError::DomUnavailable)?;
        populate_from_html(&mut result, &html);

        match context.evaluate(VISIBLE_TEXT_SCRIPT).await {
            Ok(serde_json::Value::String(text)) => set_body_text(&mut result, &text),
            Ok(other) => debug!("Unexpected innerText value for {url}: {other}"),
            Err(e) => debug!("innerText unavailable for {url}, keeping parsed word count: {e}"),
        }

        result.desktop_screenshot = self
            .save_screenshot(context, job_id, url_index, "desktop")
            .await;
        Ok(result)
    }

    async fn capture_mobile(
        &self,
        browser: &dyn Browser,
        url: &str,
        job_id: &str,
        url_index: usize,
    ) -> Option<PathBuf> {
        let context = match browser.new_context(&Viewport::mobile()).await {
            Ok(context) => context,
            Err(e) => {
                warn!("Could not open mobile context for {url}: {e}");
                return None;
            }
        };

        if let Err(e) = self.navigate(context.as_ref(), url).await {
            warn!("Mobile navigation to {url} failed: {e}");
        }
        let path = self
            .save_screenshot(context.as_ref(), job_id, url_index, "mobile")
            .await;

        if let Err(e) = context.close().await {
            debug!("Failed to close mobile context for {url}: {e}");
        }
        path
    }

    async fn navigate(
        &self,
        context: &dyn BrowserContext,
        url: &str,
    ) -> Result<Option<u16>, BrowserError> {
        match tokio::time::timeout(self.page_timeout, context.navigate(url, self.page_timeout)).await
        {
            Ok(result) => result,
            Err(_) => Err(BrowserError::Navigation(format!(
                "page load exceeded {}s",
                self.page_timeout.as_secs()
            ))),
        }
    }

    async fn save_screenshot(
        &self,
        context: &dyn BrowserContext,
        job_id: &str,
        url_index: usize,
        label: &str,
    ) -> Option<PathBuf> {
        let bytes = match context.screenshot().await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("{label} screenshot failed: {e}");
                return None;
            }
        };

        let dir = self.screenshot_dir.join(job_id);
        let path = dir.join(format!("{url_index}-{label}.png"));
        let written = async {
            tokio::fs::create_dir_all(&dir).await?;
            tokio::fs::write(&path, &bytes).await
        };
        match written.await {
            Ok(()) => Some(path),
            Err(e) => {
                warn!("Could not write {label} screenshot to {}: {e}", path.display());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    const PAGE: &str = "<html><head><title>Hello</title></head><body><h1>Hi</h1><p>a b c</p></body></html>";

    #[derive(Default)]
    struct Behaviour {
        fail_navigation: bool,
        fail_content: bool,
        fail_screenshot: bool,
        fail_context: bool,
        inner_text: Option<&'static str>,
    }

    struct FakeContext {
        behaviour: Arc<Behaviour>,
        closed: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BrowserContext for FakeContext {
        async fn navigate(&self, _url: &str, _timeout: Duration) -> Result<Option<u16>, BrowserError> {
            if self.behaviour.fail_navigation {
                Err(BrowserError::Navigation("net::ERR_NAME_NOT_RESOLVED".into()))
            } else {
                Ok(Some(200))
            }
        }

        async fn content(&self) -> Result<String, BrowserError> {
            if self.behaviour.fail_content {
                Err(BrowserError::Script("target crashed".into()))
            } else {
                Ok(PAGE.to_string())
            }
        }

        async fn evaluate(&self, _script: &str) -> Result<serde_json::Value, BrowserError> {
            match self.behaviour.inner_text {
                Some(text) => Ok(serde_json::Value::String(text.to_string())),
                None => Err(BrowserError::Script("not supported".into())),
            }
        }

        async fn screenshot(&self) -> Result<Vec<u8>, BrowserError> {
            if self.behaviour.fail_screenshot {
                Err(BrowserError::Screenshot("no surface".into()))
            } else {
                Ok(vec![0x89, b'P', b'N', b'G'])
            }
        }

        async fn close(&self) -> Result<(), BrowserError> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FakeBrowser {
        behaviour: Arc<Behaviour>,
        closed: Arc<AtomicUsize>,
    }

    impl FakeBrowser {
        fn new(behaviour: Behaviour) -> Self {
            Self {
                behaviour: Arc::new(behaviour),
                closed: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl Browser for FakeBrowser {
        async fn new_context(&self, _viewport: &Viewport) -> Result<Box<dyn BrowserContext>, BrowserError> {
            if self.behaviour.fail_context {
                return Err(BrowserError::Context("no targets".into()));
            }
            Ok(Box::new(FakeContext {
                behaviour: Arc::clone(&self.behaviour),
                closed: Arc::clone(&self.closed),
            }))
        }

        async fn close(&self) -> Result<(), BrowserError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_crawl_success_writes_both_screenshots() {
        let dir = tempfile::tempdir().unwrap();
        let browser = FakeBrowser::new(Behaviour {
            inner_text: Some("one two three four"),
            ..Default::default()
        });
        let crawler = Crawler::new(dir.path());

        let result = crawler
            .crawl(&browser, "https://example.com/", "job-1", 0)
            .await
            .unwrap();

        assert_eq!(result.status_code, 200);
        assert_eq!(result.title.as_deref(), Some("Hello"));
        assert_eq!(result.word_count, 4);
        assert_eq!(result.body_text, "one two three four");
        let desktop = result.desktop_screenshot.unwrap();
        let mobile = result.mobile_screenshot.unwrap();
        assert_eq!(desktop, dir.path().join("job-1").join("0-desktop.png"));
        assert_eq!(mobile, dir.path().join("job-1").join("0-mobile.png"));
        assert!(desktop.exists() && mobile.exists());
        assert_eq!(browser.closed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_navigation_failure_degrades_status() {
        let dir = tempfile::tempdir().unwrap();
        let browser = FakeBrowser::new(Behaviour {
            fail_navigation: true,
            ..Default::default()
        });
        let result = Crawler::new(dir.path())
            .crawl(&browser, "https://example.com/", "job-1", 1)
            .await
            .unwrap();

        assert_eq!(result.status_code, 0);
        // DOM still extracted, word count falls back to parsed text
        assert_eq!(result.title.as_deref(), Some("Hello"));
        assert_eq!(result.word_count, 4);
        assert!(result.desktop_screenshot.is_some());
    }

    #[tokio::test]
    async fn test_screenshot_failure_degrades_paths() {
        let dir = tempfile::tempdir().unwrap();
        let browser = FakeBrowser::new(Behaviour {
            fail_screenshot: true,
            ..Default::default()
        });
        let result = Crawler::new(dir.path())
            .crawl(&browser, "https://example.com/", "job-1", 2)
            .await
            .unwrap();

        assert_eq!(result.desktop_screenshot, None);
        assert_eq!(result.mobile_screenshot, None);
        assert_eq!(result.status_code, 200);
    }

    #[tokio::test]
    async fn test_unreadable_dom_is_hard_failure() {
        let dir = tempfile::tempdir().unwrap();
        let browser = FakeBrowser::new(Behaviour {
            fail_content: true,
            ..Default::default()
        });
        let err = Crawler::new(dir.path())
            .crawl(&browser, "https://example.com/", "job-1", 0)
            .await
            .unwrap_err();

        assert!(matches!(err, CrawlError::DomUnavailable(_)));
        // desktop context still closed
        assert_eq!(browser.closed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_context_is_hard_failure() {
        let dir = tempfile::tempdir().unwrap();
        let browser = FakeBrowser::new(Behaviour {
            fail_context: true,
            ..Default::default()
        });
        let err = Crawler::new(dir.path())
            .crawl(&browser, "https://example.com/", "job-1", 0)
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::ContextUnavailable(_)));
    }

    #[test]
    fn test_viewports() {
        let desktop = Viewport::desktop();
        let mobile = Viewport::mobile();
        assert_eq!((desktop.width, desktop.height), (1920, 1080));
        assert_eq!((mobile.width, mobile.height), (375, 812));
        assert!(mobile.mobile && !desktop.mobile);
        assert!(mobile.user_agent.contains("iPhone"));
    }
}
