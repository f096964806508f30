//! Lighthouse CLI performance tool.
//!
//! Spawns `lighthouse <url> --output=json --output-path=stdout` and reads
//! category scores and Core Web Vitals out of the JSON report.

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use tokio::process::Command;

use super::{PerformanceTool, RawCategoryScores, RawPerformanceReport};
use crate::models::CoreWebVitals;

#[derive(Debug, Deserialize)]
struct LighthouseReport {
    #[serde(default)]
    categories: LighthouseCategories,
    #[serde(default)]
    audits: LighthouseAudits,
    #[serde(rename = "runtimeError")]
    runtime_error: Option<RuntimeError>,
}

#[derive(Debug, Deserialize)]
struct RuntimeError {
    code: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LighthouseCategories {
    performance: Option<Category>,
    accessibility: Option<Category>,
    #[serde(rename = "best-practices")]
    best_practices: Option<Category>,
    seo: Option<Category>,
}

#[derive(Debug, Deserialize)]
struct Category {
    score: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct LighthouseAudits {
    #[serde(rename = "largest-contentful-paint")]
    largest_contentful_paint: Option<Audit>,
    #[serde(rename = "max-potential-fid")]
    max_potential_fid: Option<Audit>,
    #[serde(rename = "cumulative-layout-shift")]
    cumulative_layout_shift: Option<Audit>,
    #[serde(rename = "first-contentful-paint")]
    first_contentful_paint: Option<Audit>,
    #[serde(rename = "server-response-time")]
    server_response_time: Option<Audit>,
}

#[derive(Debug, Deserialize)]
struct Audit {
    #[serde(rename = "numericValue")]
    numeric_value: Option<f64>,
}

fn score(category: Option<Category>) -> Option<f64> {
    category.and_then(|c| c.score)
}

fn metric(audit: Option<Audit>) -> Option<f64> {
    audit.and_then(|a| a.numeric_value)
}

/// Parses a Lighthouse JSON report.
///
/// # Errors
///
/// Fails when the JSON is malformed or the report carries a runtime error
/// (page unreachable, Chrome crashed).
pub fn parse_report(json: &[u8]) -> Result<RawPerformanceReport> {
    let report: LighthouseReport =
        serde_json::from_slice(json).context("Lighthouse output is not a JSON report")?;

    if let Some(error) = report.runtime_error {
        bail!(
            "Lighthouse runtime error {}: {}",
            error.code.unwrap_or_default(),
            error.message.unwrap_or_default()
        );
    }

    let categories = report.categories;
    let audits = report.audits;
    Ok(RawPerformanceReport {
        categories: RawCategoryScores {
            performance: score(categories.performance),
            accessibility: score(categories.accessibility),
            best_practices: score(categories.best_practices),
            seo: score(categories.seo),
        },
        vitals: CoreWebVitals {
            lcp: metric(audits.largest_contentful_paint),
            fid: metric(audits.max_potential_fid),
            cls: metric(audits.cumulative_layout_shift),
            fcp: metric(audits.first_contentful_paint),
            ttfb: metric(audits.server_response_time),
        },
    })
}

/// Runs the `lighthouse` command-line tool.
#[derive(Debug, Clone)]
pub struct LighthouseCli {
    executable: PathBuf,
}

impl LighthouseCli {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }
}

#[async_trait]
impl PerformanceTool for LighthouseCli {
    async fn run(&self, url: &str) -> Result<RawPerformanceReport> {
        debug!("Running {} for {url}", self.executable.display());
        let output = Command::new(&self.executable)
            .arg(url)
            .arg("--output=json")
            .arg("--output-path=stdout")
            .arg("--quiet")
            .arg("--only-categories=performance,accessibility,best-practices,seo")
            .arg("--chrome-flags=--headless=new --no-sandbox --disable-gpu")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Abandoned on deadline; the child must not outlive the audit
            .kill_on_drop(true)
            .output()
            .await
            .with_context(|| format!("Failed to spawn {}", self.executable.display()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "Lighthouse exited with {}: {}",
                output.status,
                stderr.lines().last().unwrap_or_default()
            );
        }
        parse_report(&output.stdout)
    }
}
