//! Error type definitions.
//!
//! This module defines the error types used throughout the pipeline. Errors are
//! split by the boundary they cross: initialization, job persistence, browser
//! automation, crawling, and the orchestrator itself.

use std::time::Duration;

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),

    /// Error initializing the DNS resolver.
    #[error("DNS resolver initialization error: {0}")]
    DnsResolverError(String),
}

/// Error types for job store operations.
#[derive(Error, Debug)]
pub enum JobStoreError {
    /// The requested job does not exist.
    #[error("Job not found: {0}")]
    NotFound(String),

    /// A job with the same id already exists.
    #[error("Job already exists: {0}")]
    AlreadyExists(String),

    /// Error creating the database file.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// A stored column could not be (de)serialized.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// A stored column holds a value outside its domain.
    #[error("Corrupt job record {id}: {reason}")]
    CorruptRecord { id: String, reason: String },
}

/// Error types reported by a browser-automation backend.
#[derive(Error, Debug)]
pub enum BrowserError {
    /// The browser process could not be started.
    #[error("Browser launch failed: {0}")]
    Launch(String),

    /// A rendering context (page) could not be opened or configured.
    #[error("Browser context error: {0}")]
    Context(String),

    /// Navigation failed before the page loaded.
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// A script could not be evaluated against the loaded DOM.
    #[error("Script evaluation failed: {0}")]
    Script(String),

    /// The page could not be captured.
    #[error("Screenshot failed: {0}")]
    Screenshot(String),

    /// The browser was already closed.
    #[error("Browser is closed")]
    Closed,
}

/// Hard crawl failures. Navigation and screenshot problems degrade the
/// `CrawlResult` instead of producing one of these.
#[derive(Error, Debug)]
pub enum CrawlError {
    /// The desktop rendering context could not be opened.
    #[error("Could not open desktop browser context: {0}")]
    ContextUnavailable(#[source] BrowserError),

    /// No DOM could be read from the page at all.
    #[error("Could not read page DOM: {0}")]
    DomUnavailable(#[source] BrowserError),
}

/// Error types raised while running an audit job.
#[derive(Error, Debug)]
pub enum AuditError {
    /// The job id does not exist in the store.
    #[error("Audit job not found: {0}")]
    JobNotFound(String),

    /// The job store failed; always fatal for the job.
    #[error(transparent)]
    Store(#[from] JobStoreError),

    /// The crawl of one URL failed; fatal for that URL only.
    #[error(transparent)]
    Crawl(#[from] CrawlError),

    /// One URL exceeded its processing deadline.
    #[error("URL processing timed out after {}s", .0.as_secs())]
    UrlTimeout(Duration),

    /// The shared browser could not be acquired.
    #[error("Browser unavailable: {0}")]
    Browser(#[from] BrowserError),
}

impl AuditError {
    /// Whether the error is confined to a single URL (the job carries on).
    pub fn is_url_scoped(&self) -> bool {
        matches!(self, AuditError::Crawl(_) | AuditError::UrlTimeout(_))
    }
}

/// Error types for text-generation API calls.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Transport failure (connect, timeout, body read).
    #[error("Text generation request failed: {0}")]
    Http(#[from] ReqwestError),

    /// The API answered with a non-success status.
    #[error("Text generation API returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The API answered without any generated text.
    #[error("Text generation API returned no content")]
    EmptyResponse,
}

impl LlmError {
    /// Rate limits, server errors and transport hiccups are worth retrying.
    pub fn is_retriable(&self) -> bool {
        match self {
            LlmError::Http(e) => e.is_timeout() || e.is_connect(),
            LlmError::Status { status, .. } => *status == 429 || *status >= 500,
            LlmError::EmptyResponse => false,
        }
    }
}
