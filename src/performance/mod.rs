//! Page-performance auditing.
//!
//! A `PerformanceTool` is a black box that either produces raw category scores
//! (0.0–1.0) and Core Web Vitals or fails. `PerformanceAuditor` races it
//! against a deadline and converts the outcome into a `ToolOutcome`, so a
//! failing tool never affects the URL's status.

mod lighthouse;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};

use crate::config::PERFORMANCE_AUDIT_TIMEOUT;
use crate::models::{CoreWebVitals, PerformanceAudit, PerformanceScores, ToolOutcome};

pub use lighthouse::LighthouseCli;

/// Raw category scores as reported by the tool, each in 0.0–1.0.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawCategoryScores {
    pub performance: Option<f64>,
    pub accessibility: Option<f64>,
    pub best_practices: Option<f64>,
    pub seo: Option<f64>,
}

/// What a performance tool returns on success.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawPerformanceReport {
    pub categories: RawCategoryScores,
    pub vitals: CoreWebVitals,
}

/// An external page-performance auditing tool.
#[async_trait]
pub trait PerformanceTool: Send + Sync {
    async fn run(&self, url: &str) -> anyhow::Result<RawPerformanceReport>;
}

/// Converts a raw 0.0–1.0 score into a 0–100 integer.
fn to_percent(raw: Option<f64>) -> Option<u8> {
    raw.filter(|value| value.is_finite())
        .map(|value| (value.clamp(0.0, 1.0) * 100.0).round() as u8)
}

impl From<RawPerformanceReport> for PerformanceAudit {
    fn from(report: RawPerformanceReport) -> Self {
        let RawCategoryScores {
            performance,
            accessibility,
            best_practices,
            seo,
        } = report.categories;
        PerformanceAudit {
            scores: PerformanceScores {
                performance: to_percent(performance),
                accessibility: to_percent(accessibility),
                best_practices: to_percent(best_practices),
                seo: to_percent(seo),
            },
            core_web_vitals: report.vitals,
        }
    }
}

/// Best-effort wrapper around an optional `PerformanceTool`.
#[derive(Clone)]
pub struct PerformanceAuditor {
    tool: Option<Arc<dyn PerformanceTool>>,
    timeout: Duration,
}

impl PerformanceAuditor {
    pub fn new(tool: Arc<dyn PerformanceTool>) -> Self {
        Self {
            tool: Some(tool),
            timeout: PERFORMANCE_AUDIT_TIMEOUT,
        }
    }

    /// An auditor with no tool configured; every audit is `Unavailable`.
    pub fn disabled() -> Self {
        Self {
            tool: None,
            timeout: PERFORMANCE_AUDIT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Audits `url`. Never fails: timeouts and tool errors are logged and
    /// reported as `Unavailable`.
    pub async fn audit(&self, url: &str) -> ToolOutcome<PerformanceAudit> {
        let Some(tool) = &self.tool else {
            return ToolOutcome::unavailable("no performance tool configured");
        };

        match tokio::time::timeout(self.timeout, tool.run(url)).await {
            Ok(Ok(report)) => {
                let audit = PerformanceAudit::from(report);
                info!(
                    "Performance audit for {url}: performance {:?}, seo {:?}",
                    audit.scores.performance, audit.scores.seo
                );
                ToolOutcome::Ready(audit)
            }
            Ok(Err(e)) => {
                warn!("Performance audit for {url} failed: {e:#}");
                ToolOutcome::unavailable(e)
            }
            Err(_) => {
                warn!(
                    "Performance audit for {url} timed out after {}s",
                    self.timeout.as_secs()
                );
                ToolOutcome::unavailable(format!(
                    "timed out after {}s",
                    self.timeout.as_secs()
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTool(anyhow::Result<RawPerformanceReport>);

    #[async_trait]
    impl PerformanceTool for FixedTool {
        async fn run(&self, _url: &str) -> anyhow::Result<RawPerformanceReport> {
            match &self.0 {
                Ok(report) => Ok(*report),
                Err(e) => Err(anyhow::anyhow!("{e}")),
            }
        }
    }

    struct SlowTool;

    #[async_trait]
    impl PerformanceTool for SlowTool {
        async fn run(&self, _url: &str) -> anyhow::Result<RawPerformanceReport> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(RawPerformanceReport::default())
        }
    }

    #[test]
    fn test_to_percent() {
        assert_eq!(to_percent(Some(0.934)), Some(93));
        assert_eq!(to_percent(Some(0.935)), Some(94));
        assert_eq!(to_percent(Some(1.0)), Some(100));
        assert_eq!(to_percent(Some(0.0)), Some(0));
        assert_eq!(to_percent(None), None);
        assert_eq!(to_percent(Some(f64::NAN)), None);
    }

    #[tokio::test]
    async fn test_successful_audit_converts_scores() {
        let report = RawPerformanceReport {
            categories: RawCategoryScores {
                performance: Some(0.42),
                accessibility: None,
                best_practices: Some(0.999),
                seo: Some(0.9),
            },
            vitals: CoreWebVitals {
                lcp: Some(2500.5),
                cls: Some(0.02),
                ..Default::default()
            },
        };
        let auditor = PerformanceAuditor::new(Arc::new(FixedTool(Ok(report))));
        let audit = auditor.audit("https://example.com/").await.into_option().unwrap();
        assert_eq!(audit.scores.performance, Some(42));
        assert_eq!(audit.scores.accessibility, None);
        assert_eq!(audit.scores.best_practices, Some(100));
        assert_eq!(audit.scores.seo, Some(90));
        assert_eq!(audit.core_web_vitals.lcp, Some(2500.5));
        assert_eq!(audit.core_web_vitals.ttfb, None);
    }

    #[tokio::test]
    async fn test_tool_error_is_unavailable() {
        let auditor =
            PerformanceAuditor::new(Arc::new(FixedTool(Err(anyhow::anyhow!("chrome crashed")))));
        let outcome = auditor.audit("https://example.com/").await;
        assert_eq!(outcome.reason(), Some("chrome crashed"));
    }

    #[tokio::test]
    async fn test_timeout_is_unavailable() {
        let auditor =
            PerformanceAuditor::new(Arc::new(SlowTool)).with_timeout(Duration::from_millis(20));
        let outcome = auditor.audit("https://example.com/").await;
        assert!(!outcome.is_ready());
        assert!(outcome.reason().unwrap().contains("timed out"));
    }

    #[tokio::test]
    async fn test_disabled_auditor() {
        let outcome = PerformanceAuditor::disabled().audit("https://example.com/").await;
        assert!(!outcome.is_ready());
    }
}
