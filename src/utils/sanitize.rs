//! Error message and text clamping helpers.
//!
//! Messages stored on jobs and URL results are stripped of control characters
//! and capped at `MAX_ERROR_MESSAGE_LENGTH` characters.

use crate::config::MAX_ERROR_MESSAGE_LENGTH;

/// Removes control characters other than tab, newline and carriage return.
pub fn sanitize_error_message(message: &str) -> String {
    message
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .collect()
}

/// Sanitizes `message` and truncates it to `MAX_ERROR_MESSAGE_LENGTH` characters,
/// appending a marker with the original length when truncated.
pub fn sanitize_and_truncate_error_message(message: &str) -> String {
    let sanitized = sanitize_error_message(message);
    let length = sanitized.chars().count();
    if length <= MAX_ERROR_MESSAGE_LENGTH {
        return sanitized;
    }
    let keep = MAX_ERROR_MESSAGE_LENGTH.saturating_sub(50);
    format!(
        "{}... (truncated, original length: {} chars)",
        truncate_chars(&sanitized, keep),
        length
    )
}

/// Returns the first `max_chars` characters of `text`, never splitting a
/// UTF-8 sequence.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
