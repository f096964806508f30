//! Data model shared by every pipeline stage.

mod crawl;
mod issue;
mod job;
mod outcome;
mod scores;

pub use crawl::{CrawlResult, Heading, ImageInfo, LinkInfo};
pub use issue::{Issue, IssueCategory, ScoreBucket, Severity};
pub use job::{AuditJob, JobStatus, JobUpdate, Progress, UrlResult, UrlStatus};
pub use outcome::ToolOutcome;
pub use scores::{
    CategoryScores, ContentReview, CoreWebVitals, IssueCounts, PerformanceAudit,
    PerformanceScores, Summary,
};
