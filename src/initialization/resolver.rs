//! DNS resolver initialization.

use std::sync::Arc;
use std::time::Duration;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;

use crate::config::DNS_TIMEOUT_SECS;
use crate::error_handling::InitializationError;

/// Initializes the DNS resolver used to vet input hosts.
///
/// Uses the default upstream configuration with short timeouts so a batch of
/// unresolvable hosts cannot stall validation.
///
/// # Errors
///
/// Returns `InitializationError::DnsResolverError` if the resolver cannot be built.
pub fn init_resolver() -> Result<Arc<TokioAsyncResolver>, InitializationError> {
    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(DNS_TIMEOUT_SECS);
    opts.attempts = 2;
    // No search-domain appending: "intranet" must not become "intranet.corp.local"
    opts.ndots = 0;

    Ok(Arc::new(TokioAsyncResolver::tokio(
        ResolverConfig::default(),
        opts,
    )))
}
