//! Audit jobs and their per-URL results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use super::crawl::CrawlResult;
use super::issue::Issue;
use super::scores::{ContentReview, CoreWebVitals, PerformanceScores, Summary};

/// Lifecycle of an audit job. `Completed` and `Failed` are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

/// Latest progress snapshot. Overwritten on every stage transition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current_url: Option<String>,
    pub current_step: String,
    pub completed_urls: usize,
    pub total_urls: usize,
}

impl Progress {
    pub fn new(total_urls: usize) -> Self {
        Self {
            current_url: None,
            current_step: "queued".to_string(),
            completed_urls: 0,
            total_urls,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlStatus {
    Success,
    Error,
}

/// Outcome of one URL's pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlResult {
    pub url: String,
    pub status: UrlStatus,
    pub error: Option<String>,
    pub crawl: Option<CrawlResult>,
    pub issues: Vec<Issue>,
    pub performance: Option<PerformanceScores>,
    pub core_web_vitals: Option<CoreWebVitals>,
    pub content_review: Option<ContentReview>,
    pub has_sitemap: bool,
    pub has_robots_txt: bool,
}

impl UrlResult {
    /// A fresh result, filled in as the URL's stages complete.
    pub fn pending(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: UrlStatus::Success,
            error: None,
            crawl: None,
            issues: Vec::new(),
            performance: None,
            core_web_vitals: None,
            content_review: None,
            has_sitemap: false,
            has_robots_txt: false,
        }
    }

    /// A failed result: no crawl data and no issues.
    pub fn failed(url: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            status: UrlStatus::Error,
            error: Some(error.into()),
            ..Self::pending(url)
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == UrlStatus::Success
    }
}

/// One audit run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditJob {
    pub id: String,
    pub urls: Vec<String>,
    pub language: String,
    pub status: JobStatus,
    pub progress: Progress,
    pub results: Vec<UrlResult>,
    /// Present only once the job completed
    pub summary: Option<Summary>,
    /// Storage path of the rendered report, if rendering succeeded
    pub report_path: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl AuditJob {
    /// Creates a pending job. Duplicate URLs are dropped, keeping first-seen order.
    pub fn new(urls: impl IntoIterator<Item = String>, language: impl Into<String>) -> Self {
        let mut unique: Vec<String> = Vec::new();
        for url in urls {
            if !unique.contains(&url) {
                unique.push(url);
            }
        }
        let total = unique.len();
        Self {
            id: Uuid::new_v4().to_string(),
            urls: unique,
            language: language.into(),
            status: JobStatus::Pending,
            progress: Progress::new(total),
            results: Vec::new(),
            summary: None,
            report_path: None,
            error: None,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
        }
    }
}

/// Partial update of a job record. `None` fields are left untouched; set
/// fields overwrite (last write wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobUpdate {
    pub status: Option<JobStatus>,
    pub progress: Option<Progress>,
    pub results: Option<Vec<UrlResult>>,
    pub summary: Option<Summary>,
    pub report_path: Option<String>,
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl JobUpdate {
    pub fn progress(progress: Progress) -> Self {
        Self {
            progress: Some(progress),
            ..Default::default()
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            error: Some(error.into()),
            completed_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Applies the set fields onto `job`.
    pub fn apply_to(self, job: &mut AuditJob) {
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(progress) = self.progress {
            job.progress = progress;
        }
        if let Some(results) = self.results {
            job.results = results;
        }
        if let Some(summary) = self.summary {
            job.summary = Some(summary);
        }
        if let Some(report_path) = self.report_path {
            job.report_path = Some(report_path);
        }
        if let Some(error) = self.error {
            job.error = Some(error);
        }
        if let Some(started_at) = self.started_at {
            job.started_at = Some(started_at);
        }
        if let Some(completed_at) = self.completed_at {
            job.completed_at = Some(completed_at);
        }
    }
}
