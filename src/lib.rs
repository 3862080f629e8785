//! Patch the metadata of existing EPUBs, and build right-to-left EPUBs from a
//! single rendered HTML book.
//!
//! Both pipelines work in a scratch directory beside their output and only
//! move the finished archive into place once every step has succeeded.

pub mod build;
pub mod error;
pub mod generate;
pub mod naming;
pub mod patch;
mod scratch;

pub use crate::build::{Build, build_epub, chapters};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::patch::{locate_package_document, patch_epub};
use folio_archive::{ArchiverHandle, CommandArchiver, NativeArchiver};
use folio_config::ArchiverKind;

/// The archiver selected by configuration.
pub fn archiver(kind: ArchiverKind) -> ArchiverHandle {
    match kind {
        ArchiverKind::Native => Box::new(NativeArchiver),
        ArchiverKind::Command => Box::new(CommandArchiver::discover()),
    }
}
