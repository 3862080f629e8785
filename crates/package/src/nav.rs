//! The EPUB 3 navigation document.

use crate::Metadata;
use crate::layout::{OPS_NAMESPACE, STYLESHEET_FROM_PACKAGE, TEXT_FROM_PACKAGE, XHTML_NAMESPACE};
use crate::xhtml;
use folio_extract::Chapter;
use quick_xml::escape::escape;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A table of contents with one nested list per run of chapters that share a
/// group.
///
/// Groups are only merged while they are contiguous: a group name that shows
/// up again later starts a second nested list.
pub struct Navigation<'a> {
    chapters: &'a [Chapter],
    metadata: &'a Metadata,
}
impl<'a> Navigation<'a> {
    pub fn new(chapters: &'a [Chapter], metadata: &'a Metadata) -> Self {
        Self { chapters, metadata }
    }
}
impl Display for Navigation<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let language = escape(&self.metadata.language);
        let title = escape(&self.metadata.title);
        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(
            f,
            r#"<html xmlns="{XHTML_NAMESPACE}" xmlns:epub="{OPS_NAMESPACE}" xml:lang="{language}" lang="{language}" dir="rtl">"#
        )?;
        writeln!(f, "<head>\n<meta charset=\"UTF-8\" />\n<title>{title}</title>")?;
        writeln!(f, r#"<link rel="stylesheet" type="text/css" href="{STYLESHEET_FROM_PACKAGE}" />"#)?;
        writeln!(f, "</head>\n<body>\n<nav epub:type=\"toc\" id=\"toc\">\n<h1>{title}</h1>\n<ol>")?;
        let mut previous: Option<&str> = None;
        for chapter in self.chapters {
            if previous != Some(chapter.group.as_str()) {
                if previous.is_some() {
                    writeln!(f, "</ol>\n</li>")?;
                }
                writeln!(f, "<li>\n<span>{}</span>\n<ol>", label(&chapter.group, &chapter.filename))?;
                previous = Some(chapter.group.as_str());
            }
            writeln!(
                f,
                r#"<li><a href="{TEXT_FROM_PACKAGE}/{}">{}</a></li>"#,
                chapter.filename,
                label(&chapter.title, &chapter.filename)
            )?;
        }
        if previous.is_some() {
            writeln!(f, "</ol>\n</li>")?;
        }
        writeln!(f, "</ol>\n</nav>\n</body>\n</html>")
    }
}

/// Navigation labels must not be empty; fall back to the file name.
fn label(heading: &str, fallback: &str) -> String {
    let text = xhtml::plain_text(heading);
    if text.is_empty() { fallback.to_string() } else { text }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_well_formed, chapters};

    fn metadata() -> Metadata {
        Metadata {
            title: "Book & Co".into(),
            language: "he".into(),
            ..Metadata::default()
        }
    }

    #[test]
    fn groups_contiguous_chapters() {
        let chapters = chapters(&[("A", "One"), ("A", "Two"), ("B", "Three")]);
        let nav = Navigation::new(&chapters, &metadata()).to_string();
        assert_eq!(nav.matches("<span>").count(), 2);
        assert_eq!(nav.matches("<li><a ").count(), 3);
        let a = nav.find("<span>A</span>").unwrap();
        let b = nav.find("<span>B</span>").unwrap();
        let two = nav.find(r#"<a href="text/chapter2.xhtml">Two</a>"#).unwrap();
        assert!(a < two && two < b);
        assert!(nav.contains("<title>Book &amp; Co</title>"));
        assert_well_formed(&nav);
    }

    #[test]
    fn repeated_group_is_not_merged() {
        let chapters = chapters(&[("A", "One"), ("B", "Two"), ("A", "Three")]);
        let nav = Navigation::new(&chapters, &metadata()).to_string();
        assert_eq!(nav.matches("<span>A</span>").count(), 2);
        assert_well_formed(&nav);
    }

    #[test]
    fn empty_book_is_still_well_formed() {
        let nav = Navigation::new(&[], &metadata()).to_string();
        assert!(!nav.contains("<span>"));
        assert_well_formed(&nav);
    }

    #[test]
    fn empty_labels_fall_back_to_file_name() {
        let chapters = chapters(&[("<a href=\"#x\"></a>", "")]);
        let nav = Navigation::new(&chapters, &metadata()).to_string();
        assert!(nav.contains("<span>chapter1.xhtml</span>"));
        assert!(nav.contains(">chapter1.xhtml</a>"));
    }
}
