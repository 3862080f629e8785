//! Scoped scratch directories.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use std::path::Path;
use tempfile::TempDir;

/// A temporary working directory, removed when dropped.
///
/// Created beside the final output so the finished archive can be renamed
/// into place without crossing filesystems. Removal failures are logged, not
/// raised: by the time the guard drops, the pipeline's outcome is decided.
#[derive(Debug)]
pub(crate) struct Scratch {
    dir: Option<TempDir>,
}

impl Scratch {
    pub(crate) fn beside(output: &Path) -> Result<Self> {
        let parent = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let dir = tempfile::Builder::new()
            .prefix(".folio-")
            .tempdir_in(parent)
            .or_raise(|| ErrorKind::Io(parent.to_path_buf()))?;
        tracing::debug!(path = %dir.path().display(), "Created scratch directory");
        Ok(Self { dir: Some(dir) })
    }

    pub(crate) fn path(&self) -> &Path {
        // Only `Drop` takes the directory.
        self.dir.as_ref().map_or(Path::new(""), TempDir::path)
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        let path = dir.path().to_path_buf();
        match dir.close() {
            Ok(()) => tracing::debug!(path = %path.display(), "Removed scratch directory"),
            Err(error) => tracing::warn!(path = %path.display(), %error, "Could not remove scratch directory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let scratch = Scratch::beside(&dir.path().join("book.epub")).unwrap();
        let path = scratch.path().to_path_buf();
        assert_eq!(path.parent(), Some(dir.path()));
        fs::create_dir_all(path.join("nested/deeper")).unwrap();
        fs::write(path.join("nested/deeper/file.txt"), "x").unwrap();
        drop(scratch);
        assert!(!path.exists());
    }

    fn fail_while_holding(output: &Path, seen: &mut Option<std::path::PathBuf>) -> Result<()> {
        let scratch = Scratch::beside(output)?;
        *seen = Some(scratch.path().to_path_buf());
        exn::bail!(ErrorKind::Archive);
    }

    #[test]
    fn removed_when_returning_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut seen = None;
        assert!(fail_while_holding(&dir.path().join("book.epub"), &mut seen).is_err());
        assert!(!seen.unwrap().exists());
    }

    #[test]
    fn missing_parent_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Scratch::beside(&dir.path().join("absent/book.epub")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Io(_)));
    }
}
