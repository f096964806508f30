//! Status server HTTP handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use log::error;

use super::types::{ErrorResponse, JobResponse, StatusState};

/// Returns the job record, 404 when the id is unknown.
pub async fn job_handler(State(state): State<StatusState>, Path(id): Path<String>) -> Response {
    match state.store.get(&id).await {
        Ok(Some(job)) => Json(JobResponse::from(job)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Job not found: {id}"),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to read job {id}: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Failed to read job".to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub async fn health_handler() -> &'static str {
    "ok"
}
