//! Standalone XHTML pages, one per chapter.

use crate::layout::{OPS_NAMESPACE, STYLESHEET_FROM_TEXT, XHTML_NAMESPACE};
use crate::xhtml;
use folio_extract::Chapter;
use quick_xml::escape::escape;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// A chapter's content wrapped in a right-to-left XHTML document.
///
/// The section heading is restored as an `<h2>` above the content, since the
/// decomposer cuts the content off after the source heading.
pub struct ChapterPage<'a> {
    chapter: &'a Chapter,
    language: &'a str,
}
impl<'a> ChapterPage<'a> {
    pub fn new(chapter: &'a Chapter, language: &'a str) -> Self {
        Self { chapter, language }
    }
}
impl Display for ChapterPage<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let title = xhtml::plain_text(&self.chapter.title);
        let language = escape(self.language);
        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(f, "<!DOCTYPE html>")?;
        writeln!(
            f,
            r#"<html xmlns="{XHTML_NAMESPACE}" xmlns:epub="{OPS_NAMESPACE}" xml:lang="{language}" lang="{language}" dir="rtl">"#
        )?;
        writeln!(f, "<head>\n<meta charset=\"UTF-8\" />\n<title>{title}</title>")?;
        writeln!(f, r#"<link rel="stylesheet" type="text/css" href="{STYLESHEET_FROM_TEXT}" />"#)?;
        writeln!(f, "</head>\n<body>\n<section epub:type=\"chapter\">\n<h2>{title}</h2>")?;
        writeln!(f, "{}", xhtml::normalize(&self.chapter.content).trim())?;
        writeln!(f, "</section>\n</body>\n</html>")
    }
}
