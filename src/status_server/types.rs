//! Status server data structures.

use std::sync::Arc;

use serde::Serialize;

use crate::models::AuditJob;
use crate::storage::JobStore;

/// Shared state for the status server
#[derive(Clone)]
pub struct StatusState {
    pub store: Arc<dyn JobStore>,
}

/// JSON response for `/jobs/{id}`: the job record plus a derived percentage.
#[derive(Serialize)]
pub struct JobResponse {
    #[serde(flatten)]
    pub job: AuditJob,
    pub percentage_complete: f64,
}

impl From<AuditJob> for JobResponse {
    fn from(job: AuditJob) -> Self {
        let percentage_complete = if job.progress.total_urls > 0 {
            (job.progress.completed_urls as f64 / job.progress.total_urls as f64) * 100.0
        } else {
            0.0
        };
        Self {
            job,
            percentage_complete,
        }
    }
}

/// JSON body for error responses
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
