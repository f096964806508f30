//! SSRF-safe DNS resolver for reqwest.
//!
//! Implements `reqwest::dns::Resolve` by delegating to the system resolver and
//! then keeping only public addresses. The sitemap/robots probes use it so a
//! host that passed validation cannot be re-pointed at an internal address
//! between validation and the probe request.

use reqwest::dns::{Addrs, Name, Resolve, Resolving};
use std::net::SocketAddr;

use super::ip::is_public_ip;

/// A DNS resolver that rejects private/loopback/link-local IPs.
///
/// If *all* resolved IPs are private, the resolution fails with an error.
#[derive(Debug, Clone, Default)]
pub struct SafeResolver;

impl Resolve for SafeResolver {
    fn resolve(&self, name: Name) -> Resolving {
        Box::pin(async move {
            let host = format!("{}:0", name.as_str());
            let addrs: Vec<SocketAddr> = tokio::net::lookup_host(&host)
                .await
                .map_err(|e| -> Box<dyn std::error::Error + Send + Sync> { Box::new(e) })?
                .collect();

            let safe_addrs: Vec<SocketAddr> = addrs
                .into_iter()
                .filter(|addr| is_public_ip(addr.ip()))
                .collect();

            if safe_addrs.is_empty() {
                return Err(Box::new(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    format!(
                        "SSRF blocked: all resolved IPs for '{}' are private/reserved",
                        name.as_str()
                    ),
                ))
                    as Box<dyn std::error::Error + Send + Sync>);
            }

            let addrs: Addrs = Box::new(safe_addrs.into_iter());
            Ok(addrs)
        })
    }
}
