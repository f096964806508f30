//! Application initialization and resource setup.
//!
//! - Logger (plain or JSON)
//! - HTTP clients for probes and the text-generation API
//! - DNS resolver for input validation

mod client;
mod logger;
mod resolver;

pub use client::{init_llm_client, init_probe_client};
pub use logger::init_logger_with;
pub use resolver::init_resolver;
