//! Pipeline Error Types
//!
//! Failures from the library crates are raised into one of these kinds, so the
//! error tree reads from "what the pipeline was doing" down to the root cause.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A pipeline error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required input file does not exist.
    #[display("input not found: {}", _0.display())]
    MissingInput(#[error(not(source))] PathBuf),
    /// The unpacked EPUB has no package document.
    #[display("no package document found in {}", _0.display())]
    MissingPackageDocument(#[error(not(source))] PathBuf),
    /// The unpacked EPUB contains a symbolic link, which could point outside
    /// the scratch directory.
    #[display("EPUB contains a symbolic link: {}", _0.display())]
    UnsafeEntry(#[error(not(source))] PathBuf),
    /// The external site generator could not be run, or failed.
    #[display("site generator `{_0}` failed")]
    Generator(#[error(not(source))] String),
    /// The output name template is invalid or renders to an unusable name.
    #[display("invalid output name template")]
    Template,
    #[display("invalid configuration")]
    Config,
    /// The source HTML could not be split into chapters.
    #[display("could not split HTML into chapters")]
    Extract,
    #[display("could not write EPUB contents")]
    Package,
    #[display("archive operation failed")]
    Archive,
    #[display("I/O error on {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
