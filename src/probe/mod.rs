//! Sitemap and robots.txt existence checks.
//!
//! Both probes are HEAD requests against the URL's origin, run concurrently,
//! each under its own deadline. A probe succeeds only when the final response
//! (after redirects) has a 2xx status; timeouts and network errors count as
//! absent.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use url::Url;

use crate::config::PROBE_TIMEOUT;
use crate::models::{Issue, IssueCategory};

/// Existence of the two crawler-facing files at a site's root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeResult {
    pub has_sitemap: bool,
    pub has_robots_txt: bool,
}

impl ProbeResult {
    /// A warning for a missing sitemap, an info for a missing robots.txt.
    pub fn issues(&self) -> Vec<Issue> {
        let mut issues = Vec::new();
        if !self.has_sitemap {
            issues.push(Issue::warning(
                IssueCategory::Technical,
                "Missing sitemap.xml",
                "No sitemap.xml was found at the site root.",
                "Publish a sitemap.xml listing your canonical URLs and reference it from robots.txt.",
            ));
        }
        if !self.has_robots_txt {
            issues.push(Issue::info(
                IssueCategory::Technical,
                "Missing robots.txt",
                "No robots.txt was found at the site root.",
                "Add a robots.txt that states crawl rules and points to your sitemap.",
            ));
        }
        issues
    }
}

/// Runs the sitemap and robots.txt probes.
#[derive(Debug, Clone)]
pub struct SiteProber {
    client: Arc<reqwest::Client>,
    timeout: Duration,
}

impl SiteProber {
    pub fn new(client: Arc<reqwest::Client>) -> Self {
        Self {
            client,
            timeout: PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Probes `{origin}/sitemap.xml` and `{origin}/robots.txt` for `page_url`.
    ///
    /// An unparsable `page_url` yields both files absent.
    pub async fn probe(&self, page_url: &str) -> ProbeResult {
        let Ok(url) = Url::parse(page_url) else {
            debug!("Cannot probe unparsable URL {page_url}");
            return ProbeResult::default();
        };
        let (Ok(sitemap), Ok(robots)) = (url.join("/sitemap.xml"), url.join("/robots.txt")) else {
            return ProbeResult::default();
        };

        let (has_sitemap, has_robots_txt) = futures::join!(self.exists(sitemap), self.exists(robots));
        ProbeResult {
            has_sitemap,
            has_robots_txt,
        }
    }

    async fn exists(&self, target: Url) -> bool {
        let request = self.client.head(target.as_str()).send();
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(response)) => {
                let found = response.status().is_success();
                debug!("HEAD {target} -> {}", response.status());
                found
            }
            Ok(Err(e)) => {
                debug!("HEAD {target} failed: {e}");
                false
            }
            Err(_) => {
                debug!("HEAD {target} timed out after {}s", self.timeout.as_secs());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn prober() -> SiteProber {
        SiteProber::new(Arc::new(reqwest::Client::new()))
    }

    #[tokio::test]
    async fn test_both_present() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/robots.txt"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let result = prober().probe(&format!("{}/deep/page?x=1", server.uri())).await;
        assert_eq!(
            result,
            ProbeResult {
                has_sitemap: true,
                has_robots_txt: true
            }
        );
        assert!(result.issues().is_empty());
    }

    #[tokio::test]
    async fn test_redirect_followed() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/sitemap.xml"))
            .respond_with(
                ResponseTemplate::new(301).insert_header("Location", "/sitemap_index.xml"),
            )
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/sitemap_index.xml"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let result = prober().probe(&server.uri()).await;
        assert!(result.has_sitemap);
        // Unmatched requests get 404 from the mock server
        assert!(!result.has_robots_txt);
    }

    #[tokio::test]
    async fn test_missing_files_yield_issues() {
        let server = MockServer::start().await;
        let result = prober().probe(&server.uri()).await;
        let issues = result.issues();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].title, "Missing sitemap.xml");
        assert_eq!(issues[0].severity, crate::models::Severity::Warning);
        assert_eq!(issues[1].title, "Missing robots.txt");
        assert_eq!(issues[1].severity, crate::models::Severity::Info);
    }

    #[tokio::test]
    async fn test_timeout_counts_as_absent() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let result = prober()
            .with_timeout(Duration::from_millis(50))
            .probe(&server.uri())
            .await;
        assert_eq!(result, ProbeResult::default());
    }

    #[tokio::test]
    async fn test_unparsable_url() {
        assert_eq!(prober().probe("not a url").await, ProbeResult::default());
    }
}
