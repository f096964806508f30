//! Report rendering.
//!
//! The orchestrator hands the finished job to a `ReportRenderer` and records
//! the returned storage path. Rendering failures never fail a job.

use std::path::PathBuf;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;
use serde::Serialize;

use crate::models::{Summary, UrlResult};

/// Everything a renderer needs.
#[derive(Debug, Clone, Serialize)]
pub struct ReportInput<'a> {
    pub job_id: &'a str,
    pub urls: &'a [String],
    pub results: &'a [UrlResult],
    pub summary: &'a Summary,
}

/// Turns a finished audit into a stored document and returns its path.
#[async_trait]
pub trait ReportRenderer: Send + Sync {
    async fn render(&self, input: &ReportInput<'_>) -> Result<String>;
}

/// Writes `{job_id}.json` into an output directory.
#[derive(Debug, Clone)]
pub struct JsonReportRenderer {
    output_dir: PathBuf,
}

impl JsonReportRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl ReportRenderer for JsonReportRenderer {
    async fn render(&self, input: &ReportInput<'_>) -> Result<String> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;
        let path = self.output_dir.join(format!("{}.json", input.job_id));
        let body = serde_json::to_vec_pretty(input).context("Failed to serialize report")?;
        tokio::fs::write(&path, body)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Report written to {}", path.display());
        Ok(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryScores, IssueCounts};
    use tempfile::TempDir;

    fn summary() -> Summary {
        Summary {
            overall_score: 88,
            category_scores: CategoryScores {
                technical: 90,
                content: 80,
                performance: 85,
                accessibility: 97,
            },
            top_issues: Vec::new(),
            executive_summary: "Fine.".to_string(),
            issue_counts: IssueCounts::default(),
        }
    }

    #[tokio::test]
    async fn test_writes_json_report() {
        let dir = TempDir::new().unwrap();
        let renderer = JsonReportRenderer::new(dir.path().join("reports"));
        let urls = vec!["https://example.com/".to_string()];
        let results = vec![UrlResult::pending("https://example.com/")];
        let summary = summary();
        let path = renderer
            .render(&ReportInput {
                job_id: "job-1",
                urls: &urls,
                results: &results,
                summary: &summary,
            })
            .await
            .unwrap();

        assert!(path.ends_with("job-1.json"));
        let written: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written["job_id"], "job-1");
        assert_eq!(written["summary"]["overall_score"], 88);
        assert_eq!(written["results"][0]["url"], "https://example.com/");
    }

    #[tokio::test]
    async fn test_unwritable_directory_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();
        let renderer = JsonReportRenderer::new(blocker.join("reports"));
        let urls = Vec::new();
        let summary = summary();
        let result = renderer
            .render(&ReportInput {
                job_id: "job-2",
                urls: &urls,
                results: &[],
                summary: &summary,
            })
            .await;
        assert!(result.is_err());
    }
}
