//! HTTP client initialization.

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{PROBE_TIMEOUT, PROBE_USER_AGENT};
use crate::security::SafeResolver;

/// Initializes the client for sitemap.xml and robots.txt probes.
///
/// Configured with:
/// - `SafeResolver`, so probes never connect to private addresses
/// - Redirect following (up to 10 hops)
/// - The probe deadline as the request timeout
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_probe_client() -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .dns_resolver(Arc::new(SafeResolver))
        .redirect(reqwest::redirect::Policy::limited(10))
        .timeout(PROBE_TIMEOUT)
        .user_agent(PROBE_USER_AGENT)
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes the client for the text-generation API.
///
/// # Arguments
///
/// * `timeout` - Per-request timeout; the longest stage deadline is a sensible value
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_llm_client(timeout: Duration) -> Result<reqwest::Client, reqwest::Error> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(PROBE_USER_AGENT)
        .build()
}
