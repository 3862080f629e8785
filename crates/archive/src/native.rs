//! Pure Rust archiver backed by the `zip` crate.

use crate::error::{ErrorKind, Result};
use crate::{Archiver, Entry, Method};
use exn::ResultExt;
use std::fs::File;
use std::io;
use std::path::Path;
use tracing::instrument;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Archiver with no external dependencies.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeArchiver;

impl NativeArchiver {
    fn options(method: Method) -> SimpleFileOptions {
        let options = SimpleFileOptions::default().unix_permissions(0o644);
        match method {
            Method::Stored => options.compression_method(CompressionMethod::Stored),
            Method::Deflated => options.compression_method(CompressionMethod::Deflated).compression_level(Some(9)),
        }
    }
}

impl Archiver for NativeArchiver {
    fn name(&self) -> &str {
        "native"
    }

    #[instrument(skip(self), fields(archive = %archive.display(), destination = %destination.display()))]
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        let file = File::open(archive).or_raise(|| ErrorKind::Io(archive.to_path_buf()))?;
        let mut zip = ZipArchive::new(file).or_raise(|| ErrorKind::InvalidArchive(archive.to_path_buf()))?;
        zip.extract(destination).or_raise(|| ErrorKind::InvalidArchive(archive.to_path_buf()))?;
        tracing::debug!(entries = zip.len(), "Extracted archive");
        Ok(())
    }

    #[instrument(skip(self, entries), fields(root = %root.display(), output = %output.display()))]
    fn create(&self, root: &Path, entries: &[Entry], output: &Path) -> Result<()> {
        let file = File::create(output).or_raise(|| ErrorKind::Io(output.to_path_buf()))?;
        let mut zip = ZipWriter::new(file);
        for entry in entries {
            let source_path = root.join(&entry.name);
            let mut source = File::open(&source_path).or_raise(|| ErrorKind::Io(source_path.clone()))?;
            zip.start_file(entry.name.as_str(), Self::options(entry.method))
                .or_raise(|| ErrorKind::Io(output.to_path_buf()))?;
            io::copy(&mut source, &mut zip).or_raise(|| ErrorKind::Io(source_path.clone()))?;
        }
        zip.finish().or_raise(|| ErrorKind::Io(output.to_path_buf()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::package;
    use std::fs;
    use std::io::Read;

    fn book_tree(root: &Path) {
        fs::create_dir_all(root.join("META-INF")).unwrap();
        fs::create_dir_all(root.join("OEBPS/text")).unwrap();
        fs::write(root.join("mimetype"), "application/epub+zip").unwrap();
        fs::write(root.join("META-INF/container.xml"), "<container/>").unwrap();
        fs::write(root.join("OEBPS/text/chapter1.xhtml"), "<html/>".repeat(100)).unwrap();
    }

    #[test]
    fn mimetype_is_first_and_stored() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("tree");
        book_tree(&root);
        let output = dir.path().join("book.epub");

        package(&NativeArchiver, &root, &output).unwrap();

        let mut zip = ZipArchive::new(File::open(&output).unwrap()).unwrap();
        assert_eq!(zip.len(), 3);
        let mut first = zip.by_index(0).unwrap();
        assert_eq!(first.name(), "mimetype");
        assert_eq!(first.compression(), CompressionMethod::Stored);
        assert_eq!(first.header_start(), 0);
        let mut content = String::new();
        first.read_to_string(&mut content).unwrap();
        assert_eq!(content, "application/epub+zip");
        drop(first);

        let chapter = zip.by_name("OEBPS/text/chapter1.xhtml").unwrap();
        assert_eq!(chapter.compression(), CompressionMethod::Deflated);
    }

    #[test]
    fn extract_unpacks_nested_entries() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("tree");
        book_tree(&root);
        let output = dir.path().join("book.epub");
        package(&NativeArchiver, &root, &output).unwrap();

        let destination = dir.path().join("unpacked");
        NativeArchiver.extract(&output, &destination).unwrap();
        assert_eq!(fs::read_to_string(destination.join("mimetype")).unwrap(), "application/epub+zip");
        assert_eq!(fs::read_to_string(destination.join("META-INF/container.xml")).unwrap(), "<container/>");
    }

    #[test]
    fn extract_rejects_non_archive() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.epub");
        fs::write(&bogus, "not a zip").unwrap();
        let err = NativeArchiver.extract(&bogus, &dir.path().join("out")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidArchive(_)));
    }

    #[test]
    fn extract_missing_archive_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = NativeArchiver.extract(&dir.path().join("missing.epub"), dir.path()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Io(_)));
    }

    #[test]
    fn create_missing_source_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let entries = [crate::Entry::new("absent.txt", Method::Deflated)];
        let err = NativeArchiver.create(dir.path(), &entries, &dir.path().join("out.zip")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Io(path) if path.ends_with("absent.txt")));
    }
}
