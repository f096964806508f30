//! Error handling.
//!
//! This module provides:
//! - Error type definitions per failure boundary
//! - Retry strategy configuration for flaky external calls
//!
//! Errors are categorized into:
//! - **Input errors**: rejected by the URL validator before any job starts
//! - **Per-URL errors**: crawl failures and URL deadlines, isolated to one result
//! - **Degraded features**: tool failures surfaced as `ToolOutcome::Unavailable`
//! - **Job-fatal errors**: job store failures, which mark the job `failed`

mod types;

use std::time::Duration;

use tokio_retry::strategy::ExponentialBackoff;

// Re-export public API
pub use types::{
    AuditError, BrowserError, CrawlError, InitializationError, JobStoreError, LlmError,
};

/// Creates an exponential backoff retry strategy.
///
/// Returns a retry strategy configured with:
/// - Initial delay: `RETRY_INITIAL_DELAY_MS` milliseconds
/// - Backoff factor: `RETRY_FACTOR`
/// - Maximum delay: `RETRY_MAX_DELAY_SECS` seconds
/// - Maximum retries: `RETRY_MAX_ATTEMPTS`
///
/// The whole retry sequence still runs inside the caller's deadline, so retries
/// never extend how long a tool call may take.
pub fn get_retry_strategy() -> impl Iterator<Item = Duration> {
    ExponentialBackoff::from_millis(crate::config::RETRY_INITIAL_DELAY_MS)
        .factor(crate::config::RETRY_FACTOR)
        .max_delay(Duration::from_secs(crate::config::RETRY_MAX_DELAY_SECS))
        .take(crate::config::RETRY_MAX_ATTEMPTS)
}
