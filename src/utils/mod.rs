//! Shared helpers.
//!
//! - Error message sanitization and character-safe truncation
//! - Static CSS selector and regex compilation

mod patterns;
mod sanitize;

pub use patterns::{compile_regex_unsafe, parse_selector_unsafe};
pub use sanitize::{sanitize_and_truncate_error_message, truncate_chars};
