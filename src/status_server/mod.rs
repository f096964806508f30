//! HTTP status server for polling job progress.
//!
//! Provides two endpoints:
//! - `/jobs/{id}` - the job record as JSON, including progress and results
//! - `/health` - liveness check
//!
//! The server runs in the background and only reads from the job store.

mod handlers;
mod types;

use std::sync::Arc;

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::storage::JobStore;
use handlers::{health_handler, job_handler};
pub use types::{JobResponse, StatusState};

/// Builds the status router over `store`.
pub fn router(store: Arc<dyn JobStore>) -> Router {
    Router::new()
        .route("/jobs/{id}", get(job_handler))
        .route("/health", get(health_handler))
        .with_state(StatusState { store })
}

/// Serves the status router on an already-bound listener.
pub async fn serve(listener: TcpListener, store: Arc<dyn JobStore>) -> Result<(), anyhow::Error> {
    axum::serve(listener, router(store))
        .await
        .map_err(|e| anyhow::anyhow!("Status server error: {}", e))
}

/// Creates and starts the status server on `127.0.0.1:port`.
pub async fn start_status_server(port: u16, store: Arc<dyn JobStore>) -> Result<(), anyhow::Error> {
    let listener = TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind status server to port {}: {}", port, e))?;

    log::info!("Status server listening on http://127.0.0.1:{}/", port);
    log::info!("  - Job status: http://127.0.0.1:{}/jobs/{{id}}", port);

    serve(listener, store).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuditJob, JobUpdate, Progress};
    use crate::storage::MemoryJobStore;

    async fn spawn(store: Arc<dyn JobStore>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, store));
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_job_endpoint_reports_progress() {
        let store = Arc::new(MemoryJobStore::new());
        let job = AuditJob::new(
            vec!["https://a.example/".to_string(), "https://b.example/".to_string()],
            "en",
        );
        store.create(&job).await.unwrap();
        let mut progress = Progress::new(2);
        progress.completed_urls = 1;
        progress.current_step = "crawling".to_string();
        store
            .update(&job.id, JobUpdate::progress(progress))
            .await
            .unwrap();

        let base = spawn(store).await;
        let body: serde_json::Value = reqwest::get(format!("{base}/jobs/{}", job.id))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["id"], job.id.as_str());
        assert_eq!(body["status"], "pending");
        assert_eq!(body["progress"]["current_step"], "crawling");
        assert_eq!(body["percentage_complete"], 50.0);
    }

    #[tokio::test]
    async fn test_unknown_job_is_404() {
        let base = spawn(Arc::new(MemoryJobStore::new())).await;
        let response = reqwest::get(format!("{base}/jobs/does-not-exist"))
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_health() {
        let base = spawn(Arc::new(MemoryJobStore::new())).await;
        let response = reqwest::get(format!("{base}/health")).await.unwrap();
        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");
    }

    #[tokio::test]
    async fn test_bind_failure_is_error() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = taken.local_addr().unwrap().port();
        let err = start_status_server(port, Arc::new(MemoryJobStore::new()))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to bind"));
    }
}
