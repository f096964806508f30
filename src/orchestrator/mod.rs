//! Audit job orchestration.
//!
//! `AuditOrchestrator::run` drives one job through
//! `pending → running → completed | failed`:
//!
//! 1. Mark the job running and acquire the shared browser
//! 2. For each URL in order: crawl, analyze and probe, performance audit,
//!    content review, then persist the growing result list
//! 3. Flatten issues, translate them, score, summarize and render the report
//! 4. Mark the job completed
//!
//! A URL that fails or exceeds its deadline becomes an `error` result and the
//! job carries on. Job-store failures and browser launch failures fail the job.
//! The browser is closed on every path once acquired.

mod finalize;
mod pipeline;
mod progress;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::{error, info, warn};

use crate::config::{REPORT_RENDER_TIMEOUT, URL_PROCESSING_TIMEOUT};
use crate::content::ContentReviewer;
use crate::crawl::{BrowserLauncher, Crawler};
use crate::error_handling::AuditError;
use crate::models::{AuditJob, JobStatus, JobUpdate};
use crate::performance::PerformanceAuditor;
use crate::probe::SiteProber;
use crate::report::ReportRenderer;
use crate::storage::JobStore;
use crate::utils::sanitize_and_truncate_error_message;

pub use progress::ProgressTracker;

/// Runs audit jobs against a set of collaborators.
pub struct AuditOrchestrator {
    store: Arc<dyn JobStore>,
    launcher: Arc<dyn BrowserLauncher>,
    crawler: Crawler,
    prober: SiteProber,
    auditor: PerformanceAuditor,
    reviewer: ContentReviewer,
    renderer: Arc<dyn ReportRenderer>,
    url_timeout: Duration,
    render_timeout: Duration,
}

impl AuditOrchestrator {
    /// Creates an orchestrator with performance audits and content review
    /// disabled.
    pub fn new(
        store: Arc<dyn JobStore>,
        launcher: Arc<dyn BrowserLauncher>,
        crawler: Crawler,
        prober: SiteProber,
        renderer: Arc<dyn ReportRenderer>,
    ) -> Self {
        Self {
            store,
            launcher,
            crawler,
            prober,
            auditor: PerformanceAuditor::disabled(),
            reviewer: ContentReviewer::disabled(),
            renderer,
            url_timeout: URL_PROCESSING_TIMEOUT,
            render_timeout: REPORT_RENDER_TIMEOUT,
        }
    }

    pub fn with_performance_auditor(mut self, auditor: PerformanceAuditor) -> Self {
        self.auditor = auditor;
        self
    }

    pub fn with_content_reviewer(mut self, reviewer: ContentReviewer) -> Self {
        self.reviewer = reviewer;
        self
    }

    pub fn with_url_timeout(mut self, timeout: Duration) -> Self {
        self.url_timeout = timeout;
        self
    }

    pub fn with_render_timeout(mut self, timeout: Duration) -> Self {
        self.render_timeout = timeout;
        self
    }

    /// Runs the job to a terminal state and returns that state.
    ///
    /// Never returns an error: every failure is recorded on the job record.
    /// Jobs that are not `pending` are left untouched.
    pub async fn run(&self, job_id: &str) -> JobStatus {
        let job = match self.store.get(job_id).await {
            Ok(Some(job)) => job,
            Ok(None) => {
                error!("{}", AuditError::JobNotFound(job_id.to_string()));
                return JobStatus::Failed;
            }
            Err(e) => {
                error!("Failed to load audit job {job_id}: {e}");
                return JobStatus::Failed;
            }
        };
        if job.status != JobStatus::Pending {
            warn!(
                "Audit job {job_id} is {}, not pending; refusing to run it again",
                job.status
            );
            return job.status;
        }

        info!(
            "Starting audit job {job_id}: {} URL(s), language {}",
            job.urls.len(),
            job.language
        );
        match self.execute(&job).await {
            Ok(()) => {
                info!("Audit job {job_id} completed");
                JobStatus::Completed
            }
            Err(e) => {
                let message = sanitize_and_truncate_error_message(&e.to_string());
                error!("Audit job {job_id} failed: {message}");
                if let Err(store_err) = self.store.update(job_id, JobUpdate::failed(message)).await {
                    error!("Failed to record failure of audit job {job_id}: {store_err}");
                }
                JobStatus::Failed
            }
        }
    }

    async fn execute(&self, job: &AuditJob) -> Result<(), AuditError> {
        self.store
            .update(
                &job.id,
                JobUpdate {
                    status: Some(JobStatus::Running),
                    started_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await?;

        let mut tracker = ProgressTracker::new(&job.id, job.urls.len());
        let browser = self.launcher.launch().await?;
        let outcome = self.audit_urls(job, browser.as_ref(), &mut tracker).await;
        if let Err(e) = browser.close().await {
            warn!("Failed to close browser for job {}: {e}", job.id);
        }
        let results = outcome?;

        self.finalize(job, results, &mut tracker).await
    }
}
