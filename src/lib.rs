//! seo_audit library: scored SEO audits of small URL batches
//!
//! The pipeline vets the input against SSRF, renders each page in a headless
//! browser, runs rule-based on-page checks, probes for sitemap.xml and
//! robots.txt, optionally runs a performance audit and an LLM content review,
//! then aggregates everything into category scores, top issues and an
//! executive summary handed to a report renderer.
//!
//! # Example
//!
//! ```no_run
//! use seo_audit::{run_audit, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     file: std::path::PathBuf::from("urls.txt"),
//!     language: "de".to_string(),
//!     ..Default::default()
//! };
//!
//! let report = run_audit(config).await?;
//! println!("Job {} finished with score {:?}", report.job_id, report.overall_score);
//! # Ok(())
//! # }
//! ```
//!
//! Embedders that manage their own jobs use [`orchestrator::AuditOrchestrator`]
//! directly with their own [`storage::JobStore`] and browser backend.
//!
//! # Requirements
//!
//! This library requires a Tokio runtime.

pub mod analysis;
pub mod config;
pub mod content;
pub mod crawl;
pub mod dns;
pub mod error_handling;
pub mod initialization;
pub mod models;
pub mod orchestrator;
pub mod parse;
pub mod performance;
pub mod probe;
pub mod report;
mod run;
pub mod scoring;
pub mod security;
pub mod status_server;
pub mod storage;
mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use run::{run_audit, AuditReport, InputRejected};
