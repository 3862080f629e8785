//! Extraction Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An extraction error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The document has no `<body>...</body>` to split into chapters.
    #[display("no body found in HTML document")]
    MissingBody,
    /// A heading was opened but never closed; the source HTML needs fixing.
    #[display("unterminated <h{level}> heading at byte offset {offset}")]
    UnterminatedHeading {
        /// Heading level (1 or 2).
        level: u8,
        /// Byte offset of the opening `<hN` within the body.
        offset: usize,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The HTML either splits or it doesn't.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::MissingBody.to_string(), "no body found in HTML document");
        assert_eq!(
            ErrorKind::UnterminatedHeading { level: 2, offset: 17 }.to_string(),
            "unterminated <h2> heading at byte offset 17"
        );
    }
}
