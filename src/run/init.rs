//! Input loading and collaborator wiring for `run_audit`.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use tokio::io::AsyncReadExt;

use crate::config::{Config, SUMMARY_TIMEOUT, TRANSLATION_TIMEOUT};
use crate::content::{ContentReviewer, OpenAiCompatibleClient};
use crate::crawl::{BrowserLauncher, Crawler};
use crate::dns::HickoryHostResolver;
use crate::initialization::{init_llm_client, init_probe_client, init_resolver};
use crate::orchestrator::AuditOrchestrator;
use crate::performance::{LighthouseCli, PerformanceAuditor};
use crate::probe::SiteProber;
use crate::report::JsonReportRenderer;
use crate::security::{UrlValidator, ValidationReport, ValidatorOptions};
use crate::storage::JobStore;

/// Reads the newline-delimited URL list from `path`, or stdin for `-`.
pub(super) async fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        info!("Reading URLs from stdin");
        let mut raw = String::new();
        tokio::io::stdin()
            .read_to_string(&mut raw)
            .await
            .context("Failed to read URLs from stdin")?;
        Ok(raw)
    } else {
        tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read input file {}", path.display()))
    }
}

pub(super) async fn validate_input(config: &Config, raw: &str) -> Result<ValidationReport> {
    let resolver = init_resolver().context("Failed to initialize DNS resolver")?;
    let validator = UrlValidator::with_options(
        Arc::new(HickoryHostResolver::new(resolver)),
        ValidatorOptions {
            max_urls: config.max_urls,
            require_clean_batch: config.require_clean_batch,
            ..Default::default()
        },
    );
    Ok(validator.validate(raw).await)
}

#[cfg(feature = "chromium")]
fn browser_launcher(config: &Config) -> Result<Arc<dyn BrowserLauncher>> {
    Ok(Arc::new(crate::crawl::ChromiumLauncher::new(
        config.chrome_executable.clone(),
    )))
}

#[cfg(not(feature = "chromium"))]
fn browser_launcher(_config: &Config) -> Result<Arc<dyn BrowserLauncher>> {
    anyhow::bail!("seo_audit was built without the `chromium` feature; no browser backend is available")
}

pub(super) fn build_orchestrator(
    config: &Config,
    store: Arc<dyn JobStore>,
) -> Result<AuditOrchestrator> {
    let probe_client = init_probe_client().context("Failed to initialize HTTP client")?;

    let auditor = match &config.lighthouse {
        Some(path) => PerformanceAuditor::new(Arc::new(LighthouseCli::new(path))),
        None => {
            info!("No lighthouse executable configured; performance audits are skipped");
            PerformanceAuditor::disabled()
        }
    };

    let reviewer = match &config.llm_api_key {
        Some(key) => {
            // The longest per-call deadline bounds each HTTP request.
            let request_timeout: Duration = TRANSLATION_TIMEOUT.max(SUMMARY_TIMEOUT);
            let client = init_llm_client(request_timeout)
                .context("Failed to initialize text-generation client")?;
            ContentReviewer::new(Arc::new(OpenAiCompatibleClient::new(
                client,
                &config.llm_base_url,
                config.llm_model.clone(),
                key.clone(),
            )))
        }
        None => {
            info!("No LLM API key configured; content review and translation are skipped");
            ContentReviewer::disabled()
        }
    };

    Ok(AuditOrchestrator::new(
        store,
        browser_launcher(config)?,
        Crawler::new(&config.screenshot_dir),
        SiteProber::new(probe_client),
        Arc::new(JsonReportRenderer::new(&config.report_dir)),
    )
    .with_performance_auditor(auditor)
    .with_content_reviewer(reviewer))
}
