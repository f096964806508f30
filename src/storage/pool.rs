//! Database connection pool management.
//!
//! The pool is opened with WAL mode so the status server can read job records
//! while the orchestrator writes them.

use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::path::Path;

use log::{debug, error};
use sqlx::{Pool, Sqlite, SqlitePool};

use crate::error_handling::JobStoreError;

/// Opens the job database at `db_path`, creating the file if needed.
pub async fn init_db_pool_with_path(db_path: &Path) -> Result<Pool<Sqlite>, JobStoreError> {
    let db_path_str = db_path.to_string_lossy().to_string();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            error!("Failed to create database directory: {e}");
            JobStoreError::FileCreationError(e.to_string())
        })?;
    }
    match OpenOptions::new()
        .read(true)
        .write(true)
        .create_new(true)
        .open(&db_path_str)
    {
        Ok(_) => debug!("Database file {db_path_str} created."),
        Err(ref e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("Database file {db_path_str} already exists.")
        }
        Err(e) => {
            error!("Failed to create database file: {e}");
            return Err(JobStoreError::FileCreationError(e.to_string()));
        }
    }

    let pool = SqlitePool::connect(&format!("sqlite:{db_path_str}"))
        .await
        .map_err(|e| {
            error!("Failed to connect to database: {e}");
            JobStoreError::SqlError(e)
        })?;

    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await
        .map_err(|e| {
            error!("Failed to set WAL mode: {e}");
            JobStoreError::SqlError(e)
        })?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_creates_file_and_nested_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("jobs.db");
        let pool = init_db_pool_with_path(&path).await.unwrap();
        assert!(path.exists());

        let mode: (String,) = sqlx::query_as("PRAGMA journal_mode")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(mode.0.to_lowercase(), "wal");
    }

    #[tokio::test]
    async fn test_reopens_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.db");
        drop(init_db_pool_with_path(&path).await.unwrap());
        assert!(init_db_pool_with_path(&path).await.is_ok());
    }
}
