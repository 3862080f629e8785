//! Assembling an EPUB from a single rendered HTML book.

use crate::error::{ErrorKind, Result};
use crate::generate::ensure_html;
use crate::scratch::Scratch;
use exn::ResultExt;
use folio_archive::Archiver;
use folio_extract::{Chapter, Decomposer};
use folio_package::Metadata;
use std::fs;
use std::path::Path;
use time::UtcDateTime;
use tracing::instrument;

/// Reads `html` and splits it into chapters at `end_marker`-bounded headings.
#[instrument(skip_all, fields(html = %html.display()))]
pub fn chapters(html: &Path, end_marker: &str) -> Result<Vec<Chapter>> {
    if !html.is_file() {
        exn::bail!(ErrorKind::MissingInput(html.to_path_buf()));
    }
    let source = fs::read_to_string(html).or_raise(|| ErrorKind::Io(html.to_path_buf()))?;
    Decomposer::new(end_marker).decompose(&source).or_raise(|| ErrorKind::Extract)
}

/// Everything a build needs besides the archiver.
#[derive(Debug, Clone, Copy)]
pub struct Build<'a> {
    pub metadata: &'a Metadata,
    pub html: &'a Path,
    /// Run when `html` is missing; empty disables generation.
    pub generate: &'a [String],
    pub end_marker: &'a str,
    /// Recorded as the package's modification time.
    pub modified: UtcDateTime,
}

/// Builds an EPUB at `output` from the rendered book.
///
/// Nothing is written to `output` unless every step succeeds.
#[instrument(skip_all, fields(archiver = archiver.name(), html = %build.html.display(), output = %output.display(), chapters))]
pub fn build_epub(archiver: &dyn Archiver, build: &Build<'_>, output: &Path) -> Result<()> {
    ensure_html(build.html, build.generate)?;
    let chapters = chapters(build.html, build.end_marker)?;
    tracing::Span::current().record("chapters", chapters.len());
    if chapters.is_empty() {
        tracing::warn!("No chapters found; the EPUB will only contain its navigation document");
    }

    let scratch = Scratch::beside(output)?;
    let tree = scratch.path().join("book");
    tracing::info!(chapters = chapters.len(), "Writing EPUB contents");
    let written =
        folio_package::emit(&tree, build.metadata, &chapters, build.modified).or_raise(|| ErrorKind::Package)?;
    tracing::debug!(files = written.len(), "EPUB contents written");

    tracing::info!("Packing EPUB");
    let archive = scratch.path().join("book.epub");
    folio_archive::package(archiver, &tree, &archive).or_raise(|| ErrorKind::Archive)?;
    fs::rename(&archive, output).or_raise(|| ErrorKind::Io(output.to_path_buf()))?;
    tracing::info!("EPUB built");
    Ok(())
}
