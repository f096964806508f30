//! Progress reporting for a running job.

use log::debug;

use crate::error_handling::JobStoreError;
use crate::models::{JobUpdate, Progress};
use crate::storage::JobStore;

pub const STEP_CRAWLING: &str = "crawling";
pub const STEP_ANALYZING: &str = "analyzing";
pub const STEP_PERFORMANCE: &str = "running performance audit";
pub const STEP_CONTENT: &str = "AI content analysis";
pub const STEP_TRANSLATING: &str = "translating issues";
pub const STEP_SUMMARY: &str = "generating summary";
pub const STEP_REPORT: &str = "generating report";
pub const STEP_COMPLETED: &str = "completed";

/// Owns the job's progress snapshot and persists it on every transition.
///
/// `completed_urls` only moves forward and never exceeds `total_urls`.
#[derive(Debug)]
pub struct ProgressTracker {
    job_id: String,
    progress: Progress,
}

impl ProgressTracker {
    pub fn new(job_id: impl Into<String>, total_urls: usize) -> Self {
        Self {
            job_id: job_id.into(),
            progress: Progress::new(total_urls),
        }
    }

    pub fn snapshot(&self) -> Progress {
        self.progress.clone()
    }

    /// Records a stage transition and writes it to the store.
    pub async fn step(
        &mut self,
        store: &dyn JobStore,
        step: &str,
        current_url: Option<&str>,
    ) -> Result<(), JobStoreError> {
        self.progress.current_step = step.to_string();
        self.progress.current_url = current_url.map(str::to_string);
        debug!(
            "Job {} [{}/{}]: {step}",
            self.job_id, self.progress.completed_urls, self.progress.total_urls
        );
        store
            .update(&self.job_id, JobUpdate::progress(self.snapshot()))
            .await
    }

    /// Counts one more URL as finished. Persisted with the next write.
    pub fn url_done(&mut self) {
        if self.progress.completed_urls < self.progress.total_urls {
            self.progress.completed_urls += 1;
        }
    }

    /// The terminal snapshot: every URL done, no current URL.
    pub fn finish(&mut self) -> Progress {
        self.progress.completed_urls = self.progress.total_urls;
        self.progress.current_url = None;
        self.progress.current_step = STEP_COMPLETED.to_string();
        self.snapshot()
    }
}
