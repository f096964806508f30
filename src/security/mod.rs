//! Input vetting and SSRF protection.
//!
//! This module decides which user-supplied URLs the pipeline is allowed to
//! touch:
//! - Syntax, scheme and length checks on each input line
//! - Hostname blocklist (loopback, cloud metadata endpoints)
//! - DNS resolution with private/reserved range rejection
//!
//! `SafeResolver` repeats the address check at request time for plain HTTP
//! probes.

mod ip;
mod safe_resolver;
mod url_validation;

pub use ip::is_public_ip;
pub use safe_resolver::SafeResolver;
pub use url_validation::{normalized_key, UrlValidator, ValidationReport, ValidatorOptions};
