//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the pipeline,
//! including deadlines, size limits, scoring weights and rendering viewports.

use std::time::Duration;

// Input validation
/// Default maximum number of URLs accepted in one batch
pub const DEFAULT_MAX_URLS: usize = 20;
/// Maximum URL length (2048 characters), matching common browser and server limits
pub const MAX_URL_LENGTH: usize = 2048;
/// Hostnames that are never audited, regardless of what they resolve to
pub const BLOCKED_HOSTNAMES: &[&str] = &[
    "localhost",
    "localhost.localdomain",
    "metadata",
    "metadata.google.internal",
    "metadata.azure.internal",
    "instance-data",
    "instance-data.ec2.internal",
    "169.254.169.254",
    "127.0.0.1",
    "0.0.0.0",
    "[::1]",
    "::1",
];

// Deadlines
/// DNS lookup timeout for input validation, per attempt
pub const DNS_TIMEOUT_SECS: u64 = 3;
/// Page-load deadline for browser navigation
pub const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(30);
/// Deadline for each sitemap.xml / robots.txt HEAD request
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);
/// Deadline for one external performance audit
pub const PERFORMANCE_AUDIT_TIMEOUT: Duration = Duration::from_secs(90);
/// Deadline for a single-page content review
pub const CONTENT_REVIEW_TIMEOUT: Duration = Duration::from_secs(30);
/// Deadline for the batch issue translation call
pub const TRANSLATION_TIMEOUT: Duration = Duration::from_secs(60);
/// Deadline for the executive narrative call
pub const SUMMARY_TIMEOUT: Duration = Duration::from_secs(30);
/// Deadline for report rendering
pub const REPORT_RENDER_TIMEOUT: Duration = Duration::from_secs(60);
/// Per-URL deadline wrapping crawl, analysis, performance audit and content review
pub const URL_PROCESSING_TIMEOUT: Duration = Duration::from_secs(120);
/// A job `running` for longer than this is considered abandoned by a crashed process
pub const STALE_JOB_THRESHOLD: Duration = Duration::from_secs(10 * 60);

// Crawl limits
/// Maximum number of characters of raw HTML kept in a crawl result
pub const MAX_HTML_LENGTH: usize = 100_000;
/// Desktop rendering viewport (width, height)
pub const DESKTOP_VIEWPORT: (u32, u32) = (1920, 1080);
/// Mobile rendering viewport (width, height)
pub const MOBILE_VIEWPORT: (u32, u32) = (375, 812);

/// User-Agent for the desktop rendering context.
pub const DESKTOP_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// User-Agent for the mobile rendering context.
pub const MOBILE_USER_AGENT: &str =
    "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

/// User-Agent for plain HTTP probes (sitemap.xml, robots.txt)
pub const PROBE_USER_AGENT: &str = concat!("seo_audit/", env!("CARGO_PKG_VERSION"));

// Content review
/// Language the rule analyzer writes issues in; translation is skipped for it
pub const DEFAULT_LANGUAGE: &str = "en";
/// Maximum number of body words sent for a content review
pub const REVIEW_WORD_BUDGET: usize = 3000;
/// Maximum number of recommendations kept from a content review
pub const MAX_REVIEW_RECOMMENDATIONS: usize = 10;
/// Maximum number of tokens requested from the text generator per call
pub const LLM_MAX_TOKENS: u32 = 2048;
/// Token allowance for the batch issue translation call
pub const TRANSLATION_MAX_TOKENS: u32 = 8192;
/// Sampling temperature for every text-generation call
pub const LLM_TEMPERATURE: f32 = 0.3;

// Rule analyzer thresholds (strict comparisons)
pub const TITLE_MIN_CHARS: usize = 30;
pub const TITLE_MAX_CHARS: usize = 60;
pub const META_DESCRIPTION_MIN_CHARS: usize = 120;
pub const META_DESCRIPTION_MAX_CHARS: usize = 160;
pub const THIN_CONTENT_WORDS: usize = 300;
pub const SLOW_LOAD_MS: u64 = 5000;

// Score aggregation
pub const CRITICAL_PENALTY: u32 = 15;
pub const WARNING_PENALTY: u32 = 5;
pub const INFO_PENALTY: u32 = 1;
/// Number of unique issues surfaced in the summary
pub const TOP_ISSUES_LIMIT: usize = 10;

// Error message size limits
/// Maximum error message length in characters stored on a job or URL result
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 2000;

// Retry strategy for text-generation calls
/// Initial delay in milliseconds before first retry
pub const RETRY_INITIAL_DELAY_MS: u64 = 500;
/// Factor by which retry delay is multiplied on each attempt
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retries in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 5;
/// Maximum number of retries after the initial attempt
pub const RETRY_MAX_ATTEMPTS: usize = 2;

// Storage defaults
pub const DB_PATH: &str = "./seo_audit.db";
pub const REPORT_DIR: &str = "./reports";
pub const SCREENSHOT_DIR: &str = "./screenshots";
