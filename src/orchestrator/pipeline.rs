//! The per-URL stage sequence.

use log::{info, warn};

use super::progress::{
    ProgressTracker, STEP_ANALYZING, STEP_CONTENT, STEP_CRAWLING, STEP_PERFORMANCE,
};
use super::AuditOrchestrator;
use crate::analysis::analyze;
use crate::crawl::Browser;
use crate::error_handling::AuditError;
use crate::models::{AuditJob, JobUpdate, ToolOutcome, UrlResult};
use crate::utils::sanitize_and_truncate_error_message;

impl AuditOrchestrator {
    /// Audits every URL in order, persisting results after each one.
    pub(super) async fn audit_urls(
        &self,
        job: &AuditJob,
        browser: &dyn Browser,
        tracker: &mut ProgressTracker,
    ) -> Result<Vec<UrlResult>, AuditError> {
        let total = job.urls.len();
        let mut results = Vec::with_capacity(total);

        for (index, url) in job.urls.iter().enumerate() {
            info!("[{}/{total}] Auditing {url}", index + 1);
            let outcome = tokio::time::timeout(
                self.url_timeout,
                self.audit_url(job, browser, index, url, tracker),
            )
            .await
            .unwrap_or(Err(AuditError::UrlTimeout(self.url_timeout)));

            let result = match outcome {
                Ok(result) => result,
                Err(e) if e.is_url_scoped() => {
                    let message = sanitize_and_truncate_error_message(&e.to_string());
                    warn!("Audit of {url} failed: {message}");
                    UrlResult::failed(url.as_str(), message)
                }
                Err(e) => return Err(e),
            };
            results.push(result);
            tracker.url_done();

            self.store
                .update(
                    &job.id,
                    JobUpdate {
                        results: Some(results.clone()),
                        progress: Some(tracker.snapshot()),
                        ..Default::default()
                    },
                )
                .await?;
        }
        Ok(results)
    }

    /// crawl → analyze + probe → performance audit → content review
    async fn audit_url(
        &self,
        job: &AuditJob,
        browser: &dyn Browser,
        index: usize,
        url: &str,
        tracker: &mut ProgressTracker,
    ) -> Result<UrlResult, AuditError> {
        let store = self.store.as_ref();
        let mut result = UrlResult::pending(url);

        tracker.step(store, STEP_CRAWLING, Some(url)).await?;
        let crawl = self.crawler.crawl(browser, url, &job.id, index).await?;

        tracker.step(store, STEP_ANALYZING, Some(url)).await?;
        result.issues = analyze(&crawl);
        let probe = self.prober.probe(url).await;
        result.has_sitemap = probe.has_sitemap;
        result.has_robots_txt = probe.has_robots_txt;
        result.issues.extend(probe.issues());

        tracker.step(store, STEP_PERFORMANCE, Some(url)).await?;
        if let ToolOutcome::Ready(audit) = self.auditor.audit(url).await {
            result.performance = Some(audit.scores);
            result.core_web_vitals = Some(audit.core_web_vitals);
        }

        tracker.step(store, STEP_CONTENT, Some(url)).await?;
        result.content_review = self.reviewer.review(&crawl, &job.language).await.into_option();

        info!(
            "Audited {url}: {} issue(s), performance {}, content review {}",
            result.issues.len(),
            if result.performance.is_some() { "available" } else { "unavailable" },
            if result.content_review.is_some() { "available" } else { "unavailable" },
        );
        result.crawl = Some(crawl);
        Ok(result)
    }
}
