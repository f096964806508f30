//! In-process job store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::JobStore;
use crate::error_handling::JobStoreError;
use crate::models::{AuditJob, JobStatus, JobUpdate};

#[derive(Debug, Default)]
pub struct MemoryJobStore {
    jobs: RwLock<HashMap<String, AuditJob>>,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, job: &AuditJob) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(JobStoreError::AlreadyExists(job.id.clone()));
        }
        jobs.insert(job.id.clone(), job.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<Option<AuditJob>, JobStoreError> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn update(&self, id: &str, update: JobUpdate) -> Result<(), JobStoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| JobStoreError::NotFound(id.to_string()))?;
        update.apply_to(job);
        Ok(())
    }

    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<AuditJob>, JobStoreError> {
        let jobs = self.jobs.read().await;
        let mut matching: Vec<AuditJob> = jobs
            .values()
            .filter(|job| job.status == status)
            .cloned()
            .collect();
        matching.sort_by_key(|job| job.created_at);
        Ok(matching)
    }
}
