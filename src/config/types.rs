//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::constants::{DB_PATH, DEFAULT_LANGUAGE, DEFAULT_MAX_URLS, REPORT_DIR, SCREENSHOT_DIR};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Audit configuration.
///
/// Parsed from the command line by the binary, or constructed programmatically
/// through `Default` when the crate is used as a library.
///
/// # Examples
///
/// ```no_run
/// use seo_audit::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     file: PathBuf::from("urls.txt"),
///     language: "de".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "seo_audit",
    version,
    about = "Audits a small batch of URLs and produces a scored SEO report"
)]
pub struct Config {
    /// File to read URLs from, one per line (`-` for stdin)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Language code for review text, translated issues and the narrative
    #[arg(long, default_value = DEFAULT_LANGUAGE, env = "SEO_AUDIT_LANGUAGE")]
    pub language: String,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Job database path (SQLite file)
    #[arg(long, default_value = DB_PATH, env = "SEO_AUDIT_DB_PATH")]
    pub db_path: PathBuf,

    /// Directory rendered reports are written to
    #[arg(long, default_value = REPORT_DIR, env = "SEO_AUDIT_REPORT_DIR")]
    pub report_dir: PathBuf,

    /// Directory screenshots are written to
    #[arg(long, default_value = SCREENSHOT_DIR, env = "SEO_AUDIT_SCREENSHOT_DIR")]
    pub screenshot_dir: PathBuf,

    /// Maximum number of URLs accepted in one batch
    #[arg(long, default_value_t = DEFAULT_MAX_URLS)]
    pub max_urls: usize,

    /// Refuse to start when any input line is rejected
    #[arg(long, default_value_t = false)]
    pub require_clean_batch: bool,

    /// Path to the `lighthouse` executable (performance audits are skipped when unset)
    #[arg(long, env = "SEO_AUDIT_LIGHTHOUSE")]
    pub lighthouse: Option<PathBuf>,

    /// Chrome/Chromium executable used for crawling (auto-detected when unset)
    #[arg(long, env = "SEO_AUDIT_CHROME")]
    pub chrome_executable: Option<PathBuf>,

    /// Base URL of an OpenAI-compatible text-generation API
    #[arg(long, default_value = "https://api.openai.com/v1", env = "SEO_AUDIT_LLM_BASE_URL")]
    pub llm_base_url: String,

    /// Model name sent to the text-generation API
    #[arg(long, default_value = "gpt-4o-mini", env = "SEO_AUDIT_LLM_MODEL")]
    pub llm_model: String,

    /// API key for the text-generation API (content review is skipped when unset)
    #[arg(long, env = "LLM_API_KEY", hide_env_values = true)]
    pub llm_api_key: Option<String>,

    /// HTTP status server port for polling job progress (disabled by default)
    #[arg(long)]
    pub status_port: Option<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            file: PathBuf::from("urls.txt"),
            language: DEFAULT_LANGUAGE.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            db_path: PathBuf::from(DB_PATH),
            report_dir: PathBuf::from(REPORT_DIR),
            screenshot_dir: PathBuf::from(SCREENSHOT_DIR),
            max_urls: DEFAULT_MAX_URLS,
            require_clean_batch: false,
            lighthouse: None,
            chrome_executable: None,
            llm_base_url: "https://api.openai.com/v1".to_string(),
            llm_model: "gpt-4o-mini".to_string(),
            llm_api_key: None,
            status_port: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_parses_minimal_args() {
        let config = Config::try_parse_from(["seo_audit", "urls.txt"]).unwrap();
        assert_eq!(config.file, PathBuf::from("urls.txt"));
        assert_eq!(config.max_urls, DEFAULT_MAX_URLS);
        assert!(!config.require_clean_batch);
        assert_eq!(config.status_port, None);
    }

    #[test]
    fn test_config_parses_overrides() {
        let config = Config::try_parse_from([
            "seo_audit",
            "-",
            "--language",
            "de",
            "--max-urls",
            "5",
            "--require-clean-batch",
            "--status-port",
            "8089",
        ])
        .unwrap();
        assert_eq!(config.file, PathBuf::from("-"));
        assert_eq!(config.language, "de");
        assert_eq!(config.max_urls, 5);
        assert!(config.require_clean_batch);
        assert_eq!(config.status_port, Some(8089));
    }

    #[test]
    fn test_default_matches_constants() {
        let config = Config::default();
        assert_eq!(config.language, DEFAULT_LANGUAGE);
        assert_eq!(config.db_path, PathBuf::from(DB_PATH));
        assert!(config.llm_api_key.is_none());
    }
}
