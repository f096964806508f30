//! DNS resolution.
//!
//! Provides the `HostResolver` capability used for SSRF checks, with a
//! `hickory-resolver` implementation for production use.

mod resolution;

// Re-export public API
pub use resolution::{HickoryHostResolver, HostResolver};
