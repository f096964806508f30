//! Hostname resolution.
//!
//! This module resolves hostnames to every address they point at, so the URL
//! validator can refuse hosts that resolve into private address space.

use std::net::IpAddr;
use std::sync::Arc;

use anyhow::{Error, Result};
use async_trait::async_trait;
use hickory_resolver::TokioAsyncResolver;

/// Resolves a hostname to its IP addresses.
///
/// The URL validator only talks to this trait, so tests can substitute a fixed
/// hostname table for real DNS.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Returns every A/AAAA address for `host`.
    ///
    /// # Errors
    ///
    /// Returns an error if resolution fails or yields no addresses.
    async fn lookup_ips(&self, host: &str) -> Result<Vec<IpAddr>>;
}

/// `HostResolver` backed by `hickory-resolver`.
#[derive(Clone)]
pub struct HickoryHostResolver {
    resolver: Arc<TokioAsyncResolver>,
}

impl HickoryHostResolver {
    pub fn new(resolver: Arc<TokioAsyncResolver>) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl HostResolver for HickoryHostResolver {
    async fn lookup_ips(&self, host: &str) -> Result<Vec<IpAddr>> {
        // IPv6 hosts arrive bracketed from `Url::host_str`
        let host = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(vec![ip]);
        }

        let response = self.resolver.lookup_ip(host).await.map_err(Error::new)?;
        let ips: Vec<IpAddr> = response.iter().collect();
        if ips.is_empty() {
            return Err(Error::msg(format!("No IP addresses found for {host}")));
        }
        Ok(ips)
    }
}
