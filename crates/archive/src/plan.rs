//! Deciding which files go into an archive, in which order, and how.

use crate::error::{ErrorKind, Result};
use crate::{Entry, Method};
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};

/// File that must be the first, uncompressed entry of an EPUB.
pub const MIMETYPE: &str = "mimetype";

/// An ordered list of archive entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub entries: Vec<Entry>,
    /// `false` when the tree had no `mimetype` file and the plan falls back
    /// to a plain compressed archive.
    pub conformant: bool,
}

impl Plan {
    /// Walks `root` and plans an archive of every file below it.
    ///
    /// With a `mimetype` file at the root, it is planned first and stored;
    /// everything else follows, deflated, in sorted path order. Without one,
    /// every file is deflated. Directories get no entries of their own.
    ///
    /// Fails with [`ErrorKind::UnsafeEntry`] if the tree contains a symbolic
    /// link.
    pub fn for_tree(root: &Path) -> Result<Self> {
        let mut files = walk(root)?;
        files.sort();
        let conformant = root.join(MIMETYPE).is_file();
        let mut entries = Vec::with_capacity(files.len());
        if conformant {
            entries.push(Entry::new(MIMETYPE, Method::Stored));
            files.retain(|name| name != MIMETYPE);
        } else {
            tracing::warn!(root = %root.display(), "No mimetype file at archive root; archive will not be a conformant EPUB");
        }
        entries.extend(files.into_iter().map(|name| Entry::new(name, Method::Deflated)));
        Ok(Self { entries, conformant })
    }
}

/// Relative, `/`-separated names of every regular file below `root`.
fn walk(root: &Path) -> Result<Vec<String>> {
    let mut files = Vec::new();
    let mut stack: Vec<PathBuf> = vec![root.to_path_buf()];
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
                // Infallible: every path read from below `root` starts with `root`.
                let Ok(relative) = path.strip_prefix(root) else {
                    continue;
                };
                let name = relative.components().map(|c| c.as_os_str().to_string_lossy()).collect::<Vec<_>>().join("/");
                files.push(name);
            }
            // Other special files (sockets, fifos) are skipped.
        }
    }
    Ok(files)
}
