//! Job persistence.
//!
//! The orchestrator only talks to a `JobStore`. Two implementations ship with
//! the crate:
//! - `MemoryJobStore` for tests and embedding
//! - `SqliteJobStore` backed by a WAL-mode SQLite file

mod memory;
mod pool;
mod sqlite;
mod sweep;

use async_trait::async_trait;

use crate::error_handling::JobStoreError;
use crate::models::{AuditJob, JobStatus, JobUpdate};

pub use memory::MemoryJobStore;
pub use pool::init_db_pool_with_path;
pub use sqlite::{run_migrations, SqliteJobStore};
pub use sweep::sweep_stale_jobs;

/// Persistent job records with last-write-wins partial updates.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Inserts a new job. Fails with `AlreadyExists` on an id collision.
    async fn create(&self, job: &AuditJob) -> Result<(), JobStoreError>;

    async fn get(&self, id: &str) -> Result<Option<AuditJob>, JobStoreError>;

    /// Overwrites the fields set in `update`. Fails with `NotFound` for an
    /// unknown id.
    async fn update(&self, id: &str, update: JobUpdate) -> Result<(), JobStoreError>;

    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<AuditJob>, JobStoreError>;
}
