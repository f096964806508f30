//! Tool-derived and aggregated scores.

use serde::{Deserialize, Serialize};

use super::issue::{Issue, Severity};

/// Lighthouse-style category scores, each 0–100 or absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerformanceScores {
    pub performance: Option<u8>,
    pub accessibility: Option<u8>,
    pub best_practices: Option<u8>,
    pub seo: Option<u8>,
}

impl PerformanceScores {
    pub fn is_empty(&self) -> bool {
        self.performance.is_none()
            && self.accessibility.is_none()
            && self.best_practices.is_none()
            && self.seo.is_none()
    }
}

/// Core Web Vitals in milliseconds (CLS is unitless).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreWebVitals {
    pub lcp: Option<f64>,
    pub fid: Option<f64>,
    pub cls: Option<f64>,
    pub fcp: Option<f64>,
    pub ttfb: Option<f64>,
}

/// A successful performance audit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceAudit {
    pub scores: PerformanceScores,
    pub core_web_vitals: CoreWebVitals,
}

/// Qualitative content review, scores in [1, 10].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentReview {
    pub content_quality: u8,
    pub readability: u8,
    pub keyword_optimization: u8,
    pub recommendations: Vec<String>,
    pub summary: String,
}

/// The four summary category scores, each in [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub technical: u8,
    pub content: u8,
    pub performance: u8,
    pub accessibility: u8,
}

/// Issue totals across every URL of a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueCounts {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
    pub total: usize,
}

impl IssueCounts {
    pub fn tally(issues: &[Issue]) -> Self {
        let mut counts = Self::default();
        for issue in issues {
            match issue.severity {
                Severity::Critical => counts.critical += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Info => counts.info += 1,
            }
        }
        counts.total = issues.len();
        counts
    }
}

/// Final job summary. Computed once after all URLs finish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub overall_score: u8,
    pub category_scores: CategoryScores,
    pub top_issues: Vec<Issue>,
    pub executive_summary: String,
    pub issue_counts: IssueCounts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::IssueCategory;

    #[test]
    fn test_tally() {
        let issues = vec![
            Issue::critical(IssueCategory::Meta, "a", "", ""),
            Issue::critical(IssueCategory::Content, "b", "", ""),
            Issue::info(IssueCategory::Technical, "c", "", ""),
        ];
        let counts = IssueCounts::tally(&issues);
        assert_eq!(
            counts,
            IssueCounts {
                critical: 2,
                warning: 0,
                info: 1,
                total: 3
            }
        );
    }

    #[test]
    fn test_empty_scores() {
        assert!(PerformanceScores::default().is_empty());
        let scores = PerformanceScores {
            seo: Some(90),
            ..Default::default()
        };
        assert!(!scores.is_empty());
    }
}
