use std::fmt::{Display, Formatter, Result as FmtResult};

/// One second-level section of the source document, together with the name
/// of the top-level section it was found in.
///
/// Records are produced in document order and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Literal text of the enclosing `<h1>` heading.
    pub group: String,
    /// Literal text of this section's `<h2>` heading.
    pub title: String,
    /// `chapter<N>.xhtml`, numbered from 1 without gaps.
    pub filename: String,
    /// Raw HTML between the closing `</h2>` and the next boundary.
    pub content: String,
}
impl Chapter {
    /// File name for the `index`th (1-based) emitted chapter.
    pub fn filename_for(index: usize) -> String {
        format!("chapter{index}.xhtml")
    }

    /// Manifest identifier, the file name without its extension.
    pub fn id(&self) -> &str {
        self.filename.strip_suffix(".xhtml").unwrap_or(&self.filename)
    }
}
impl Display for Chapter {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}\t{}\t{}", self.filename, self.group, self.title)
    }
}
