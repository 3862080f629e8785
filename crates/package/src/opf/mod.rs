//! The package document (`content.opf`): generation for new books and
//! in-place metadata substitution for existing ones.

pub mod patch;

use crate::Metadata;
use crate::error::{ErrorKind, Result};
use crate::layout::{DC_NAMESPACE, NAVIGATION_FROM_PACKAGE, OPF_NAMESPACE, STYLESHEET_FROM_PACKAGE, TEXT_FROM_PACKAGE};
use exn::ResultExt;
use folio_extract::Chapter;
use quick_xml::escape::escape;
use std::fmt::{Display, Formatter, Result as FmtResult};
use time::UtcDateTime;
use time::macros::format_description;

const NAV_ID: &str = "nav";
const STYLESHEET_ID: &str = "style";
const BOOK_ID: &str = "bookid";
const TRANSLATOR_ID: &str = "translator";

/// Builds a single Dublin Core element with an escaped value.
pub(crate) fn dc_element(name: &str, value: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!(r#"<dc:{name} id="{}">{}</dc:{name}>"#, escape(id), escape(value)),
        None => format!("<dc:{name}>{}</dc:{name}>", escape(value)),
    }
}

/// The translator's `dc:contributor`, plus the role refinement EPUB 3 needs.
pub(crate) fn translator_elements(translator: &str, epub2: bool) -> Vec<String> {
    if epub2 {
        return vec![format!(
            r#"<dc:contributor id="{TRANSLATOR_ID}" opf:role="trl">{}</dc:contributor>"#,
            escape(translator)
        )];
    }
    vec![
        dc_element("contributor", translator, Some(TRANSLATOR_ID)),
        format!(r##"<meta refines="#{TRANSLATOR_ID}" property="role" scheme="marc:relators">trl</meta>"##),
    ]
}

/// An EPUB 3 package document listing the navigation document, the
/// stylesheet, and every chapter, read right to left.
pub struct PackageDocument<'a> {
    chapters: &'a [Chapter],
    metadata: &'a Metadata,
    modified: String,
}
impl<'a> PackageDocument<'a> {
    /// `modified` becomes the `dcterms:modified` timestamp.
    pub fn new(chapters: &'a [Chapter], metadata: &'a Metadata, modified: UtcDateTime) -> Result<Self> {
        let modified = modified
            .format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z"))
            .or_raise(|| ErrorKind::Timestamp)?;
        Ok(Self { chapters, metadata, modified })
    }

    fn optional(f: &mut Formatter<'_>, name: &str, value: &str) -> FmtResult {
        if value.is_empty() {
            return Ok(());
        }
        writeln!(f, "    {}", dc_element(name, value, None))
    }
}
impl Display for PackageDocument<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let m = self.metadata;
        writeln!(f, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(
            f,
            r#"<package xmlns="{OPF_NAMESPACE}" version="3.0" unique-identifier="{BOOK_ID}" xml:lang="{}" dir="rtl">"#,
            escape(&m.language)
        )?;
        writeln!(f, r#"  <metadata xmlns:dc="{DC_NAMESPACE}">"#)?;
        writeln!(f, "    {}", dc_element("identifier", &m.identifier, Some(BOOK_ID)))?;
        writeln!(f, "    {}", dc_element("title", &m.title, None))?;
        writeln!(f, "    {}", dc_element("language", &m.language, None))?;
        if !m.author.is_empty() {
            writeln!(f, "    {}", dc_element("creator", &m.author, Some("author")))?;
        }
        if !m.translator.is_empty() {
            for element in translator_elements(&m.translator, false) {
                writeln!(f, "    {element}")?;
            }
        }
        Self::optional(f, "publisher", &m.publisher)?;
        Self::optional(f, "rights", &m.rights)?;
        Self::optional(f, "description", &m.description)?;
        Self::optional(f, "subject", &m.subject)?;
        Self::optional(f, "date", &m.date)?;
        writeln!(f, r#"    <meta property="dcterms:modified">{}</meta>"#, self.modified)?;
        writeln!(f, "  </metadata>")?;
        writeln!(f, "  <manifest>")?;
        writeln!(
            f,
            r#"    <item id="{NAV_ID}" href="{NAVIGATION_FROM_PACKAGE}" media-type="application/xhtml+xml" properties="nav"/>"#
        )?;
        writeln!(f, r#"    <item id="{STYLESHEET_ID}" href="{STYLESHEET_FROM_PACKAGE}" media-type="text/css"/>"#)?;
        for chapter in self.chapters {
            writeln!(
                f,
                r#"    <item id="{}" href="{TEXT_FROM_PACKAGE}/{}" media-type="application/xhtml+xml"/>"#,
                chapter.id(),
                chapter.filename
            )?;
        }
        writeln!(f, "  </manifest>")?;
        writeln!(f, r#"  <spine page-progression-direction="rtl">"#)?;
        writeln!(f, r#"    <itemref idref="{NAV_ID}" linear="no"/>"#)?;
        for chapter in self.chapters {
            writeln!(f, r#"    <itemref idref="{}"/>"#, chapter.id())?;
        }
        writeln!(f, "  </spine>")?;
        writeln!(f, "</package>")
    }
}
