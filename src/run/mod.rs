//! End-to-end audit of one URL batch, as driven by the CLI.

mod init;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::{Config, STALE_JOB_THRESHOLD};
use crate::models::{AuditJob, JobStatus};
use crate::security::ValidationReport;
use crate::storage::{sweep_stale_jobs, JobStore, SqliteJobStore};

/// Outcome of an audit run.
#[derive(Debug, Clone)]
pub struct AuditReport {
    pub job_id: String,
    pub status: JobStatus,
    pub total_urls: usize,
    pub successful: usize,
    pub failed: usize,
    /// Present when the job completed
    pub overall_score: Option<u8>,
    pub executive_summary: Option<String>,
    pub report_path: Option<String>,
    /// Failure message when the job failed
    pub error: Option<String>,
    pub db_path: PathBuf,
    pub elapsed_seconds: f64,
}

/// The input batch was refused before any job was created.
#[derive(Debug, thiserror::Error)]
#[error("URL batch rejected: {}", .0.errors.join("; "))]
pub struct InputRejected(pub ValidationReport);

/// Validates the URL batch named by `config.file`, then creates and runs one
/// audit job.
///
/// # Errors
///
/// `InputRejected` (inside the `anyhow::Error`) when validation fails, or an
/// initialization error. A job that runs and fails is reported through
/// `AuditReport::status`, not as an error.
pub async fn run_audit(config: Config) -> Result<AuditReport> {
    let start = Instant::now();

    let store: Arc<dyn JobStore> = Arc::new(
        SqliteJobStore::open(&config.db_path)
            .await
            .context("Failed to open job database")?,
    );
    sweep_stale_jobs(store.as_ref(), STALE_JOB_THRESHOLD)
        .await
        .context("Failed to sweep stale jobs")?;

    let raw = init::read_input(&config.file).await?;
    let validation = init::validate_input(&config, &raw).await?;
    for warning in &validation.warnings {
        warn!("{warning}");
    }
    if !validation.valid {
        return Err(InputRejected(validation).into());
    }

    let job = AuditJob::new(validation.urls, config.language.clone());
    let orchestrator = create_job(store.as_ref(), &job, || {
        init::build_orchestrator(&config, Arc::clone(&store))
    })
    .await?;

    if let Some(port) = config.status_port {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            if let Err(e) = crate::status_server::start_status_server(port, store).await {
                warn!("{e}");
            }
        });
    }

    let status = orchestrator.run(&job.id).await;

    let finished = store
        .get(&job.id)
        .await
        .context("Failed to read finished audit job")?
        .with_context(|| format!("Audit job {} disappeared", job.id))?;
    let successful = finished.results.iter().filter(|r| r.is_success()).count();

    Ok(AuditReport {
        job_id: finished.id,
        status,
        total_urls: finished.urls.len(),
        successful,
        failed: finished.results.len() - successful,
        overall_score: finished.summary.as_ref().map(|s| s.overall_score),
        executive_summary: finished.summary.map(|s| s.executive_summary),
        report_path: finished.report_path,
        error: finished.error,
        db_path: config.db_path,
        elapsed_seconds: start.elapsed().as_secs_f64(),
    })
}

/// Wires the pipeline, then persists `job`. A wiring failure leaves no job
/// record behind.
async fn create_job<T>(
    store: &dyn JobStore,
    job: &AuditJob,
    wire: impl FnOnce() -> Result<T>,
) -> Result<T> {
    let wired = wire()?;
    store.create(job).await.context("Failed to create audit job")?;
    info!("Created audit job {} for {} URL(s)", job.id, job.urls.len());
    Ok(wired)
}
