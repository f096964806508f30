//! Audit issues.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::config::{CRITICAL_PENALTY, INFO_PENALTY, WARNING_PENALTY};

/// How badly an issue hurts the page.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Severity {
    /// Blocks indexing or ranking
    Critical,
    /// Suboptimal, should be fixed
    Warning,
    /// Advisory
    Info,
}

impl Severity {
    /// Sort rank used when surfacing issues: critical < warning < info.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }

    /// Points subtracted from the issue's score bucket.
    pub fn penalty(self) -> u32 {
        match self {
            Severity::Critical => CRITICAL_PENALTY,
            Severity::Warning => WARNING_PENALTY,
            Severity::Info => INFO_PENALTY,
        }
    }
}

/// The area of the page an issue belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum IssueCategory {
    Meta,
    Content,
    Performance,
    Accessibility,
    Technical,
    Mobile,
}

/// The four summary buckets issue categories fold into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum ScoreBucket {
    Technical,
    Content,
    Performance,
    Accessibility,
}

impl IssueCategory {
    /// Maps the category to the bucket its penalty is charged against.
    pub fn bucket(self) -> ScoreBucket {
        match self {
            IssueCategory::Meta | IssueCategory::Mobile | IssueCategory::Technical => {
                ScoreBucket::Technical
            }
            IssueCategory::Content => ScoreBucket::Content,
            IssueCategory::Performance => ScoreBucket::Performance,
            IssueCategory::Accessibility => ScoreBucket::Accessibility,
        }
    }
}

/// A single finding. Issues are value objects; reporting deduplicates them by
/// exact title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub category: IssueCategory,
    pub title: String,
    pub description: String,
    pub recommendation: String,
}

impl Issue {
    pub fn new(
        severity: Severity,
        category: IssueCategory,
        title: impl Into<String>,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            title: title.into(),
            description: description.into(),
            recommendation: recommendation.into(),
        }
    }

    pub fn critical(
        category: IssueCategory,
        title: impl Into<String>,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Critical, category, title, description, recommendation)
    }

    pub fn warning(
        category: IssueCategory,
        title: impl Into<String>,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Warning, category, title, description, recommendation)
    }

    pub fn info(
        category: IssueCategory,
        title: impl Into<String>,
        description: impl Into<String>,
        recommendation: impl Into<String>,
    ) -> Self {
        Self::new(Severity::Info, category, title, description, recommendation)
    }
}
