//! Rewriting the metadata of an existing EPUB.

use crate::error::{ErrorKind, Result};
use crate::scratch::Scratch;
use exn::{OptionExt, ResultExt};
use folio_archive::Archiver;
use folio_package::{Metadata, layout, opf};
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::instrument;

/// Where package documents are usually found when `container.xml` is no help.
const CANDIDATES: [&str; 5] = [
    "OEBPS/content.opf",
    "OPS/content.opf",
    "EPUB/content.opf",
    "EPUB/package.opf",
    "content.opf",
];

#[derive(Debug, Deserialize)]
struct Container {
    rootfiles: RootFiles,
}

#[derive(Debug, Deserialize)]
struct RootFiles {
    #[serde(rename = "rootfile", default)]
    rootfile: Vec<RootFile>,
}

#[derive(Debug, Deserialize)]
struct RootFile {
    #[serde(rename = "@full-path")]
    full_path: String,
}

/// Writes a copy of the EPUB at `input` to `output`, with `metadata` patched
/// into its package document.
///
/// Nothing is written to `output` unless every step succeeds.
#[instrument(skip_all, fields(archiver = archiver.name(), input = %input.display(), output = %output.display()))]
pub fn patch_epub(archiver: &dyn Archiver, metadata: &Metadata, input: &Path, output: &Path) -> Result<()> {
    if !input.is_file() {
        exn::bail!(ErrorKind::MissingInput(input.to_path_buf()));
    }
    let scratch = Scratch::beside(output)?;
    let tree = scratch.path().join("book");
    fs::create_dir_all(&tree).or_raise(|| ErrorKind::Io(tree.clone()))?;

    tracing::info!("Unpacking EPUB");
    archiver.extract(input, &tree).or_raise(|| ErrorKind::Archive)?;

    let document_path = locate_package_document(&tree)?
        .ok_or_raise(|| ErrorKind::MissingPackageDocument(input.to_path_buf()))?;
    tracing::info!(document = %document_path.display(), "Patching package document");
    let document = fs::read_to_string(&document_path).or_raise(|| ErrorKind::Io(document_path.clone()))?;
    let patched = opf::patch::patch(&document, metadata).or_raise(|| ErrorKind::Package)?;
    fs::write(&document_path, patched).or_raise(|| ErrorKind::Io(document_path.clone()))?;

    tracing::info!("Repacking EPUB");
    let archive = scratch.path().join("book.epub");
    folio_archive::package(archiver, &tree, &archive).or_raise(|| ErrorKind::Archive)?;
    fs::rename(&archive, output).or_raise(|| ErrorKind::Io(output.to_path_buf()))?;
    tracing::info!("EPUB patched");
    Ok(())
}

/// Finds the package document of an unpacked EPUB.
///
/// Tries the first `rootfile` named by `META-INF/container.xml`, then the
/// usual fixed locations, then the first `*.opf` anywhere in the tree (sorted
/// path order).
///
/// Fails with [`ErrorKind::UnsafeEntry`] if the tree contains a symbolic link,
/// before any path inside it is resolved.
pub fn locate_package_document(tree: &Path) -> Result<Option<PathBuf>> {
    let files = regular_files(tree)?;
    if let Some(path) = from_container(tree, &files) {
        return Ok(Some(path));
    }
    if let Some(path) = CANDIDATES.iter().map(|candidate| tree.join(candidate)).find(|path| files.contains(path)) {
        tracing::debug!(path = %path.display(), "Package document found at a fixed location");
        return Ok(Some(path));
    }
    tracing::debug!("Searching unpacked EPUB for a package document");
    Ok(files.into_iter().find(|path| path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("opf"))))
}

/// Every regular file below `tree`, in sorted path order. Links are never
/// followed.
fn regular_files(tree: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![tree.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in fs::read_dir(&current).or_raise(|| ErrorKind::Io(current.clone()))? {
            let entry = entry.or_raise(|| ErrorKind::Io(current.clone()))?;
            let path = entry.path();
            let kind = entry.file_type().or_raise(|| ErrorKind::Io(path.clone()))?;
            if kind.is_symlink() {
                exn::bail!(ErrorKind::UnsafeEntry(path));
            } else if kind.is_dir() {
                stack.push(path);
            } else if kind.is_file() {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

fn from_container(tree: &Path, files: &[PathBuf]) -> Option<PathBuf> {
    let container_path = tree.join(layout::CONTAINER);
    if !files.contains(&container_path) {
        return None;
    }
    let xml = fs::read_to_string(&container_path).ok()?;
    let container: Container = match quick_xml::de::from_str(&xml) {
        Ok(container) => container,
        Err(error) => {
            tracing::warn!(%error, "Unreadable container.xml; falling back to known locations");
            return None;
        },
    };
    let full_path = &container.rootfiles.rootfile.first()?.full_path;
    let relative = Path::new(full_path);
    if !relative.components().all(|c| matches!(c, Component::Normal(_))) {
        tracing::warn!(full_path = %full_path, "Ignoring rootfile path outside the EPUB");
        return None;
    }
    let path = tree.join(relative);
    if files.contains(&path) {
        tracing::debug!(path = %path.display(), "Package document named by container.xml");
        Some(path)
    } else {
        tracing::warn!(full_path = %full_path, "container.xml names a missing package document");
        None
    }
}
