//! EPUB package generation.
//!
//! Turns [`Chapter`] records into a complete, unzipped EPUB tree (see
//! [`emit`]) and rewrites the metadata of existing package documents (see
//! [`opf::patch`]). All of it is text generation: nothing here parses or
//! validates the resulting XML.
//!
//! The tree produced by [`emit`]:
//!
//! ```text
//! mimetype
//! META-INF/container.xml
//! META-INF/com.apple.ibooks.display-options.xml
//! OEBPS/content.opf
//! OEBPS/nav.xhtml
//! OEBPS/styles/style.css
//! OEBPS/text/chapter<N>.xhtml
//! ```

mod assets;
mod consts;
pub mod error;
pub mod layout;
mod metadata;
mod nav;
pub mod opf;
mod page;
pub mod xhtml;

pub use crate::metadata::Metadata;
pub use crate::nav::Navigation;
pub use crate::opf::PackageDocument;
pub use crate::page::ChapterPage;
use crate::assets::{BOOK_STYLESHEET, Builtins};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
pub use folio_extract::Chapter;
use std::fs;
use std::path::{Path, PathBuf};
use time::UtcDateTime;
use tracing::instrument;

/// Writes a complete EPUB tree for `chapters` under `root`.
///
/// Returns the paths written, relative to `root`. Every file referenced by
/// the package document exists once this returns successfully.
#[instrument(skip_all, fields(root = %root.display(), chapters = chapters.len()))]
pub fn emit(root: &Path, metadata: &Metadata, chapters: &[Chapter], modified: UtcDateTime) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(chapters.len() + 6);
    let mut write = |relative: &str, content: &[u8]| -> Result<()> {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).or_raise(|| ErrorKind::Write(parent.to_path_buf()))?;
        }
        fs::write(&path, content).or_raise(|| ErrorKind::Write(path.clone()))?;
        tracing::trace!(path = relative, bytes = content.len(), "Wrote package file");
        written.push(PathBuf::from(relative));
        Ok(())
    };

    write(layout::MIMETYPE, layout::MIMETYPE_CONTENT.as_bytes())?;
    write(layout::CONTAINER, layout::container().as_bytes())?;
    write(layout::DISPLAY_OPTIONS, layout::display_options().as_bytes())?;
    write(layout::STYLESHEET, &Builtins::load(BOOK_STYLESHEET)?)?;
    for chapter in chapters {
        let page = ChapterPage::new(chapter, &metadata.language).to_string();
        write(&format!("{}/{}", layout::TEXT_DIR, chapter.filename), page.as_bytes())?;
    }
    write(layout::NAVIGATION, Navigation::new(chapters, metadata).to_string().as_bytes())?;
    write(layout::PACKAGE_DOCUMENT, PackageDocument::new(chapters, metadata, modified)?.to_string().as_bytes())?;

    tracing::debug!(files = written.len(), "Package tree written");
    Ok(written)
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::{Chapter, Metadata};
    use quick_xml::Reader;
    use quick_xml::events::Event;

    /// Streams the whole document through an XML reader, panicking on the
    /// first syntax error.
    pub(crate) fn assert_well_formed(xml: &str) {
        let mut reader = Reader::from_str(xml);
        loop {
            match reader.read_event() {
                Ok(Event::Eof) => break,
                Ok(_) => {},
                Err(e) => panic!("not well-formed at {}: {e}\n{xml}", reader.buffer_position()),
            }
        }
    }

    pub(crate) fn chapters(headings: &[(&str, &str)]) -> Vec<Chapter> {
        headings.iter()
            .enumerate()
            .map(|(i, (group, title))| Chapter {
                group: group.to_string(),
                title: title.to_string(),
                filename: Chapter::filename_for(i + 1),
                content: format!("<p>{title}</p>"),
            })
            .collect()
    }

    pub(crate) fn metadata() -> Metadata {
        Metadata {
            title: "Book".into(),
            author: "Author".into(),
            translator: "Translator".into(),
            language: "he".into(),
            publisher: "Publisher".into(),
            rights: "Rights".into(),
            description: "Description".into(),
            subject: "Subject".into(),
            date: "2024-01-01".into(),
            identifier: "urn:isbn:0000".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_well_formed, chapters, metadata};
    use time::macros::utc_datetime;

    #[test]
    fn emits_every_referenced_file() {
        let dir = tempfile::tempdir().unwrap();
        let chapters = chapters(&[("A", "One"), ("A", "Two"), ("B", "Three")]);
        let written = emit(dir.path(), &metadata(), &chapters, utc_datetime!(2026-10-19 00:00:00)).unwrap();
        assert_eq!(written.len(), chapters.len() + 6);
        assert_eq!(written[0], PathBuf::from("mimetype"));
        for path in &written {
            assert!(dir.path().join(path).is_file(), "{} missing", path.display());
        }
        assert_eq!(fs::read(dir.path().join("mimetype")).unwrap(), b"application/epub+zip");
        for chapter in &chapters {
            let page = fs::read_to_string(dir.path().join("OEBPS/text").join(&chapter.filename)).unwrap();
            assert_well_formed(&page);
        }
        let opf = fs::read_to_string(dir.path().join(layout::PACKAGE_DOCUMENT)).unwrap();
        assert_well_formed(&opf);
        // Every manifest href resolves to a written file.
        for href in opf.split("href=\"").skip(1).filter_map(|s| s.split('"').next()) {
            assert!(dir.path().join("OEBPS").join(href).is_file(), "{href} missing");
        }
    }

    #[test]
    fn emit_into_unwritable_root_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"").unwrap();
        let err = emit(&blocker, &metadata(), &[], utc_datetime!(2026-10-19 00:00:00)).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Write(_)));
    }
}
