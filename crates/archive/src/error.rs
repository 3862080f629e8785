//! Archive Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// An archive error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for archive operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Reading or writing a file failed (permissions, disk space, ...).
    #[display("I/O error on {}", _0.display())]
    Io(#[error(not(source))] PathBuf),
    /// The input is not a readable zip archive.
    #[display("invalid archive: {}", _0.display())]
    InvalidArchive(#[error(not(source))] PathBuf),
    /// The tree holds a symbolic link, which would either escape the tree or
    /// be dropped from the archive.
    #[display("refusing to archive symbolic link: {}", _0.display())]
    UnsafeEntry(#[error(not(source))] PathBuf),
    /// An external tool is not installed or not on `PATH`.
    #[display("`{_0}` not found on PATH")]
    ToolNotFound(#[error(not(source))] &'static str),
    /// An external tool ran but exited unsuccessfully.
    /// A code of `-1` means the process was terminated by a signal.
    #[display("`{tool}` exited with code {code}: {stderr}")]
    CommandFailed {
        tool: &'static str,
        code: i32,
        stderr: String,
    },
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
