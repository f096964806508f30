//! URL validation and SSRF protection.
//!
//! This module turns free-form user input (one candidate URL per line) into a
//! vetted URL list. Besides syntax checks it prevents SSRF (Server-Side Request
//! Forgery) by refusing:
//! - Non-HTTP/HTTPS schemes (file://, ftp://, etc.)
//! - Loopback and cloud-metadata hostnames
//! - Hosts that resolve into private, link-local, CGNAT or loopback ranges
//!
//! The DNS check runs for every candidate, even after earlier lines failed.

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::{Arc, LazyLock};

use log::{debug, warn};
use regex::Regex;
use serde::Serialize;
use url::{Host, Url};

use super::ip::is_public_ip;
use crate::config::{BLOCKED_HOSTNAMES, DEFAULT_MAX_URLS, MAX_URL_LENGTH};
use crate::dns::HostResolver;
use crate::utils::compile_regex_unsafe;

static SCHEME_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex_unsafe(r"^[A-Za-z][A-Za-z0-9+.\-]*://", "SCHEME_PREFIX")
});

/// Validation limits and policy.
#[derive(Debug, Clone)]
pub struct ValidatorOptions {
    /// Maximum number of non-blank lines; exceeding it rejects the whole batch
    pub max_urls: usize,
    /// Maximum URL length after scheme normalization
    pub max_url_length: usize,
    /// When set, any rejected line makes the batch invalid
    pub require_clean_batch: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            max_urls: DEFAULT_MAX_URLS,
            max_url_length: MAX_URL_LENGTH,
            require_clean_batch: false,
        }
    }
}

/// Outcome of validating one batch of input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// True when at least one URL survived and no batch-level error occurred
    pub valid: bool,
    /// Vetted URLs in input order
    pub urls: Vec<String>,
    /// One message per rejected line, or a single batch-level error
    pub errors: Vec<String>,
    /// Non-fatal notes such as skipped duplicates
    pub warnings: Vec<String>,
}

/// Validates raw URL input against syntax, scheme, blocklist and DNS rules.
#[derive(Clone)]
pub struct UrlValidator {
    resolver: Arc<dyn HostResolver>,
    options: ValidatorOptions,
}

impl UrlValidator {
    pub fn new(resolver: Arc<dyn HostResolver>) -> Self {
        Self::with_options(resolver, ValidatorOptions::default())
    }

    pub fn with_options(resolver: Arc<dyn HostResolver>, options: ValidatorOptions) -> Self {
        Self { resolver, options }
    }

    /// Validates newline-delimited URL input.
    ///
    /// # Arguments
    ///
    /// * `raw_text` - Free-form text, one candidate URL per line
    ///
    /// # Returns
    ///
    /// A `ValidationReport`; callers must not start a job unless `valid` is true.
    pub async fn validate(&self, raw_text: &str) -> ValidationReport {
        let lines: Vec<&str> = raw_text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        let mut report = ValidationReport::default();

        if lines.len() > self.options.max_urls {
            report.errors.push(format!(
                "Too many URLs: {} provided, maximum is {}",
                lines.len(),
                self.options.max_urls
            ));
            return report;
        }

        let mut seen: HashSet<String> = HashSet::new();

        for line in lines {
            let url = match self.check_syntax(line) {
                Ok(url) => url,
                Err(message) => {
                    debug!("Rejected URL input line: {message}");
                    report.errors.push(message);
                    continue;
                }
            };

            let key = normalized_key(&url);
            if !seen.insert(key) {
                report
                    .warnings
                    .push(format!("Duplicate URL skipped: {line}"));
                continue;
            }

            if let Err(message) = self.check_resolution(&url, line).await {
                warn!("{message}");
                report.errors.push(message);
                continue;
            }

            report.urls.push(url.to_string());
        }

        let clean = !self.options.require_clean_batch || report.errors.is_empty();
        report.valid = !report.urls.is_empty() && clean;
        report
    }

    /// Scheme normalization, length, parse, scheme and blocklist checks.
    fn check_syntax(&self, line: &str) -> Result<Url, String> {
        let candidate = if SCHEME_PREFIX.is_match(line) {
            line.to_string()
        } else {
            format!("https://{line}")
        };

        if candidate.chars().count() > self.options.max_url_length {
            return Err(format!(
                "URL exceeds maximum length of {} characters: {}...",
                self.options.max_url_length,
                line.chars().take(50).collect::<String>()
            ));
        }

        let url = Url::parse(&candidate).map_err(|e| format!("Invalid URL '{line}': {e}"))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(format!(
                    "Unsupported URL scheme '{scheme}' (only http:// and https:// allowed): {line}"
                ));
            }
        }

        let host = url
            .host_str()
            .ok_or_else(|| format!("URL has no host component: {line}"))?;
        if is_blocked_host(host) {
            return Err(format!("Blocked host '{host}' is not allowed: {line}"));
        }

        Ok(url)
    }

    /// Resolves the host and refuses any non-public address.
    async fn check_resolution(&self, url: &Url, line: &str) -> Result<(), String> {
        let ips: Vec<IpAddr> = match url.host() {
            Some(Host::Ipv4(ip)) => vec![IpAddr::V4(ip)],
            Some(Host::Ipv6(ip)) => vec![IpAddr::V6(ip)],
            Some(Host::Domain(domain)) => self
                .resolver
                .lookup_ips(domain)
                .await
                .map_err(|e| format!("Could not resolve host '{domain}': {e}"))?,
            None => return Err(format!("URL has no host component: {line}")),
        };

        if let Some(ip) = ips.iter().find(|ip| !is_public_ip(**ip)) {
            return Err(format!(
                "Host resolves to a private or reserved address ({ip}): {line}"
            ));
        }
        Ok(())
    }
}

/// Duplicate-detection key: origin, path without trailing slashes, and query.
pub fn normalized_key(url: &Url) -> String {
    let mut key = url.origin().ascii_serialization();
    key.push_str(url.path().trim_end_matches('/'));
    if let Some(query) = url.query() {
        key.push('?');
        key.push_str(query);
    }
    key
}

/// Checks a hostname against the blocklist, including localhost variants.
fn is_blocked_host(host: &str) -> bool {
    let host = host.to_lowercase();
    let host = host.trim_end_matches('.');
    BLOCKED_HOSTNAMES.contains(&host) || host.ends_with(".localhost")
}
