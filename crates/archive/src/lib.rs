//! Reading and writing zip archives, with EPUB entry-ordering rules.
//!
//! Two [`Archiver`]s are provided: [`NativeArchiver`] (pure Rust, via the
//! `zip` crate) and [`CommandArchiver`] (the external `zip`/`unzip` tools).

mod command;
pub mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod native;
mod plan;

pub use crate::command::CommandArchiver;
pub use crate::error::{Error, ErrorKind, Result};
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::{Call, MockArchiver};
pub use crate::native::NativeArchiver;
pub use crate::plan::{MIMETYPE, Plan};
use std::path::Path;
use tracing::instrument;

/// Shared handle to an archiver implementation.
pub type ArchiverHandle = Box<dyn Archiver + Send + Sync>;

/// How a single entry's bytes are laid out in the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// No compression.
    Stored,
    /// DEFLATE, maximum compression.
    Deflated,
}

/// A file to be archived, named relative to the tree root with `/` separators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub method: Method,
}

impl Entry {
    pub fn new(name: impl Into<String>, method: Method) -> Self {
        Self {
            name: name.into(),
            method,
        }
    }
}

/// Zip archive reader/writer.
pub trait Archiver {
    /// Short identifier for logs.
    fn name(&self) -> &str;

    /// Unpacks every entry of `archive` into `destination`, overwriting
    /// existing files.
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()>;

    /// Writes `entries` (read from below `root`) to a new archive at
    /// `output`, in the given order and with the given methods.
    fn create(&self, root: &Path, entries: &[Entry], output: &Path) -> Result<()>;
}

/// Archives the tree at `root` into `output`, ordering entries as an EPUB
/// requires. Returns the plan that was used.
#[instrument(skip_all, fields(archiver = archiver.name(), root = %root.display(), output = %output.display(), entries))]
pub fn package(archiver: &dyn Archiver, root: &Path, output: &Path) -> Result<Plan> {
    let plan = Plan::for_tree(root)?;
    tracing::Span::current().record("entries", plan.entries.len());
    archiver.create(root, &plan.entries, output)?;
    tracing::debug!(conformant = plan.conformant, "Archive written");
    Ok(plan)
}
