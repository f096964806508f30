//! SQLite-backed job store.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use log::info;
use serde::de::DeserializeOwned;
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};

use super::pool::init_db_pool_with_path;
use super::JobStore;
use crate::error_handling::JobStoreError;
use crate::models::{AuditJob, JobStatus, JobUpdate};

const SELECT_COLUMNS: &str = "SELECT id, urls, language, status, progress, results, summary, \
     report_path, error, created_at, started_at, completed_at FROM audit_jobs";

/// Runs the migrations in the crate's `migrations/` directory.
pub async fn run_migrations(pool: &Pool<Sqlite>) -> Result<(), JobStoreError> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir.as_path()).await?;
    migrator.run(pool).await?;
    Ok(())
}

#[derive(Debug, Clone)]
pub struct SqliteJobStore {
    pool: Pool<Sqlite>,
}

impl SqliteJobStore {
    /// Opens (or creates) the database file and brings its schema up to date.
    pub async fn open(db_path: &Path) -> Result<Self, JobStoreError> {
        let pool = init_db_pool_with_path(db_path).await?;
        run_migrations(&pool).await?;
        info!("Job store ready at {}", db_path.display());
        Ok(Self { pool })
    }

    /// Wraps an existing pool whose schema is already migrated.
    pub fn from_pool(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    async fn write(&self, job: &AuditJob) -> Result<(), JobStoreError> {
        sqlx::query(
            "UPDATE audit_jobs SET status = ?, progress = ?, results = ?, summary = ?, \
             report_path = ?, error = ?, started_at = ?, completed_at = ? WHERE id = ?",
        )
        .bind(job.status.as_ref())
        .bind(serde_json::to_string(&job.progress)?)
        .bind(serde_json::to_string(&job.results)?)
        .bind(job.summary.as_ref().map(serde_json::to_string).transpose()?)
        .bind(&job.report_path)
        .bind(&job.error)
        .bind(job.started_at.map(|t| t.timestamp_millis()))
        .bind(job.completed_at.map(|t| t.timestamp_millis()))
        .bind(&job.id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

fn json_column<T: DeserializeOwned>(row: &SqliteRow, column: &str) -> Result<T, JobStoreError> {
    let text: String = row.try_get(column)?;
    Ok(serde_json::from_str(&text)?)
}

fn millis_column(
    row: &SqliteRow,
    column: &str,
    id: &str,
) -> Result<Option<DateTime<Utc>>, JobStoreError> {
    let Some(millis) = row.try_get::<Option<i64>, _>(column)? else {
        return Ok(None);
    };
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(Some)
        .ok_or_else(|| JobStoreError::CorruptRecord {
            id: id.to_string(),
            reason: format!("{column} out of range: {millis}"),
        })
}

fn job_from_row(row: &SqliteRow) -> Result<AuditJob, JobStoreError> {
    let id: String = row.try_get("id")?;
    let status_text: String = row.try_get("status")?;
    let status = JobStatus::from_str(&status_text).map_err(|_| JobStoreError::CorruptRecord {
        id: id.clone(),
        reason: format!("unknown status {status_text:?}"),
    })?;
    let summary = row
        .try_get::<Option<String>, _>("summary")?
        .map(|text| serde_json::from_str(&text))
        .transpose()?;
    let created_at = millis_column(row, "created_at", &id)?.ok_or_else(|| {
        JobStoreError::CorruptRecord {
            id: id.clone(),
            reason: "missing created_at".to_string(),
        }
    })?;

    Ok(AuditJob {
        urls: json_column(row, "urls")?,
        language: row.try_get("language")?,
        status,
        progress: json_column(row, "progress")?,
        results: json_column(row, "results")?,
        summary,
        report_path: row.try_get("report_path")?,
        error: row.try_get("error")?,
        created_at,
        started_at: millis_column(row, "started_at", &id)?,
        completed_at: millis_column(row, "completed_at", &id)?,
        id,
    })
}

#[async_trait]
impl JobStore for SqliteJobStore {
    async fn create(&self, job: &AuditJob) -> Result<(), JobStoreError> {
        let inserted = sqlx::query(
            "INSERT INTO audit_jobs (id, urls, language, status, progress, results, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?) ON CONFLICT(id) DO NOTHING",
        )
        .bind(&job.id)
        .bind(serde_json::to_string(&job.urls)?)
        .bind(&job.language)
        .bind(job.status.as_ref())
        .bind(serde_json::to_string(&job.progress)?)
        .bind(serde_json::to_string(&job.results)?)
        .bind(job.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;
        if inserted.rows_affected() == 0 {
            return Err(JobStoreError::AlreadyExists(job.id.clone()));
        }
        // Remaining columns go through the regular update path.
        self.write(job).await
    }

    async fn get(&self, id: &str) -> Result<Option<AuditJob>, JobStoreError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(job_from_row).transpose()
    }

    async fn update(&self, id: &str, update: JobUpdate) -> Result<(), JobStoreError> {
        let mut job = self
            .get(id)
            .await?
            .ok_or_else(|| JobStoreError::NotFound(id.to_string()))?;
        update.apply_to(&mut job);
        self.write(&job).await
    }

    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<AuditJob>, JobStoreError> {
        let rows = sqlx::query(&format!("{SELECT_COLUMNS} WHERE status = ? ORDER BY created_at"))
            .bind(status.as_ref())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(job_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Issue, IssueCategory, Progress, UrlResult};
    use tempfile::TempDir;

    async fn store() -> (TempDir, SqliteJobStore) {
        let dir = TempDir::new().unwrap();
        let store = SqliteJobStore::open(&dir.path().join("jobs.db")).await.unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_round_trip_through_sqlite() {
        let (_dir, store) = store().await;
        let job = AuditJob::new(
            vec!["https://example.com/".to_string(), "https://example.org/".to_string()],
            "de",
        );
        store.create(&job).await.unwrap();

        let loaded = store.get(&job.id).await.unwrap().unwrap();
        assert_eq!(loaded.urls, job.urls);
        assert_eq!(loaded.language, "de");
        assert_eq!(loaded.status, JobStatus::Pending);
        assert_eq!(loaded.progress, Progress::new(2));
        assert_eq!(
            loaded.created_at.timestamp_millis(),
            job.created_at.timestamp_millis()
        );
    }

    #[tokio::test]
    async fn test_duplicate_create_fails() {
        let (_dir, store) = store().await;
        let job = AuditJob::new(vec!["https://example.com/".to_string()], "en");
        store.create(&job).await.unwrap();
        assert!(matches!(
            store.create(&job).await,
            Err(JobStoreError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let (_dir, store) = store().await;
        let job = AuditJob::new(vec!["https://example.com/".to_string()], "en");
        store.create(&job).await.unwrap();

        let mut result = UrlResult::pending("https://example.com/");
        result.issues.push(Issue::warning(
            IssueCategory::Meta,
            "Title too short",
            "12 chars",
            "Expand",
        ));
        store
            .update(
                &job.id,
                JobUpdate {
                    status: Some(JobStatus::Running),
                    started_at: Some(Utc::now()),
                    results: Some(vec![result.clone()]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .update(&job.id, JobUpdate::progress(Progress::new(1)))
            .await
            .unwrap();

        let loaded = store.get(&job.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, JobStatus::Running);
        assert!(loaded.started_at.is_some());
        assert_eq!(loaded.results, vec![result]);
        assert_eq!(
            store.list_by_status(JobStatus::Running).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_update_unknown_job() {
        let (_dir, store) = store().await;
        assert!(matches!(
            store.update("missing", JobUpdate::failed("x")).await,
            Err(JobStoreError::NotFound(_))
        ));
        assert!(store.get("missing").await.unwrap().is_none());
    }
}
