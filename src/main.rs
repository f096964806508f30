//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `seo_audit` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use seo_audit::initialization::init_logger_with;
use seo_audit::models::JobStatus;
use seo_audit::{run_audit, Config, InputRejected};

#[tokio::main]
async fn main() -> Result<()> {
    // .env in the working directory, then next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_audit(config).await {
        Ok(report) => {
            println!(
                "Audit job {} {}: {} URL{} ({} succeeded, {} failed) in {:.1}s",
                report.job_id,
                report.status,
                report.total_urls,
                if report.total_urls == 1 { "" } else { "s" },
                report.successful,
                report.failed,
                report.elapsed_seconds
            );
            if let Some(score) = report.overall_score {
                println!("Overall score: {score}/100");
            }
            if let Some(summary) = &report.executive_summary {
                println!("\n{summary}\n");
            }
            if let Some(path) = &report.report_path {
                println!("Report saved to {path}");
            }
            println!("Job record saved in {}", report.db_path.display());
            if report.status == JobStatus::Failed {
                eprintln!(
                    "seo_audit error: {}",
                    report.error.as_deref().unwrap_or("audit failed")
                );
                process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            if let Some(rejected) = e.downcast_ref::<InputRejected>() {
                eprintln!("Input rejected:");
                for error in &rejected.0.errors {
                    eprintln!("  - {error}");
                }
                process::exit(2);
            }
            eprintln!("seo_audit error: {:#}", e);
            process::exit(1);
        }
    }
}
