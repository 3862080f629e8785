//! Package Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A packaging error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for packaging operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The package document has no closing `</metadata>` to anchor insertions on.
    #[display("package document has no metadata section")]
    MissingMetadataSection,
    /// A compiled-in asset is missing from the binary.
    #[display("asset not found: {_0}")]
    AssetNotFound(#[error(not(source))] String),
    /// A timestamp could not be formatted.
    #[display("failed to format timestamp")]
    Timestamp,
    /// Writing a package file failed.
    #[display("failed to write {}", _0.display())]
    Write(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Write(_))
    }
}
