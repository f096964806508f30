//! Recovery of jobs abandoned by a crashed process.

use std::time::Duration;

use chrono::Utc;
use log::{info, warn};

use super::JobStore;
use crate::error_handling::JobStoreError;
use crate::models::{JobStatus, JobUpdate};

/// Force-fails every `running` job that started more than `threshold` ago.
///
/// Returns the number of jobs failed. A running job without a start time is
/// treated by its creation time.
pub async fn sweep_stale_jobs(
    store: &dyn JobStore,
    threshold: Duration,
) -> Result<usize, JobStoreError> {
    let cutoff = Utc::now()
        - chrono::Duration::from_std(threshold).unwrap_or_else(|_| chrono::Duration::zero());
    let mut swept = 0;
    for job in store.list_by_status(JobStatus::Running).await? {
        let started = job.started_at.unwrap_or(job.created_at);
        if started >= cutoff {
            continue;
        }
        warn!(
            "Job {} has been running since {started}; marking it failed",
            job.id
        );
        store
            .update(
                &job.id,
                JobUpdate::failed(format!(
                    "Job abandoned: still running after {} minutes",
                    threshold.as_secs() / 60
                )),
            )
            .await?;
        swept += 1;
    }
    if swept > 0 {
        info!("Swept {swept} stale job(s)");
    }
    Ok(swept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuditJob;
    use crate::storage::MemoryJobStore;

    async fn running_job(store: &MemoryJobStore, started_minutes_ago: i64) -> String {
        let job = AuditJob::new(vec!["https://example.com/".to_string()], "en");
        store.create(&job).await.unwrap();
        store
            .update(
                &job.id,
                JobUpdate {
                    status: Some(JobStatus::Running),
                    started_at: Some(Utc::now() - chrono::Duration::minutes(started_minutes_ago)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        job.id
    }

    #[tokio::test]
    async fn test_sweeps_only_stale_running_jobs() {
        let store = MemoryJobStore::new();
        let stale = running_job(&store, 30).await;
        let fresh = running_job(&store, 1).await;
        let pending = AuditJob::new(vec!["https://example.org/".to_string()], "en");
        store.create(&pending).await.unwrap();

        let swept = sweep_stale_jobs(&store, Duration::from_secs(600)).await.unwrap();
        assert_eq!(swept, 1);

        let stale = store.get(&stale).await.unwrap().unwrap();
        assert_eq!(stale.status, JobStatus::Failed);
        assert_eq!(
            stale.error.as_deref(),
            Some("Job abandoned: still running after 10 minutes")
        );
        assert!(stale.completed_at.is_some());
        assert_eq!(
            store.get(&fresh).await.unwrap().unwrap().status,
            JobStatus::Running
        );
        assert_eq!(
            store.get(&pending.id).await.unwrap().unwrap().status,
            JobStatus::Pending
        );
    }
}
