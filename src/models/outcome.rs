//! Tagged results for best-effort collaborators.

use std::fmt::Display;

/// Result of a degraded-but-non-fatal operation (performance audit, content
/// review, translation).
///
/// These never fail the pipeline: a failure is reported as `Unavailable` with a
/// reason, and the caller decides how an absent feature is recorded.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutcome<T> {
    /// The tool produced a value.
    Ready(T),
    /// The tool was skipped, timed out, or failed.
    Unavailable(String),
}

impl<T> ToolOutcome<T> {
    pub fn unavailable(reason: impl Display) -> Self {
        ToolOutcome::Unavailable(reason.to_string())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ToolOutcome::Ready(_))
    }

    /// Drops the failure reason, keeping only the value.
    pub fn into_option(self) -> Option<T> {
        match self {
            ToolOutcome::Ready(value) => Some(value),
            ToolOutcome::Unavailable(_) => None,
        }
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            ToolOutcome::Ready(_) => None,
            ToolOutcome::Unavailable(reason) => Some(reason),
        }
    }
}

impl<T> From<Option<T>> for ToolOutcome<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => ToolOutcome::Ready(value),
            None => ToolOutcome::Unavailable("no value produced".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_option() {
        assert_eq!(ToolOutcome::Ready(3).into_option(), Some(3));
        assert_eq!(ToolOutcome::<u8>::unavailable("timeout").into_option(), None);
    }

    #[test]
    fn test_reason() {
        let outcome = ToolOutcome::<u8>::unavailable("timed out after 90s");
        assert!(!outcome.is_ready());
        assert_eq!(outcome.reason(), Some("timed out after 90s"));
    }
}
