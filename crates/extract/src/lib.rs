//! Splits a single rendered HTML book into chapter records.
//!
//! The source document is expected to be the single-page output of a static
//! site generator: one `<body>` holding top-level `<h1>` sections, each of
//! which holds one or more `<h2>` sections. Every `<h2>` section with
//! non-blank content becomes one [`Chapter`], in document order.
//!
//! This is a structural scan over literal markers, not an HTML parse. Content
//! is sliced verbatim out of the source, so whatever markup the generator
//! produced is carried through untouched.

mod chapter;
pub mod error;
mod scan;

pub use crate::chapter::Chapter;
use crate::error::Result;
use crate::scan::Heading;
use memchr::memmem::Finder;
use tracing::instrument;

/// Default literal that marks the end of the book's reading content.
pub const DEFAULT_END_MARKER: &str = "<div id=\"end-of-book\">";

/// Splits HTML documents into [`Chapter`]s.
///
/// # Examples
///
/// ```rust
/// use folio_extract::Decomposer;
///
/// let html = "<html><body><h1 >A</h1><h2 >One</h2>text1<h2 >Two</h2>text2</body></html>";
/// let chapters = Decomposer::default().decompose(html).unwrap();
/// assert_eq!(chapters.len(), 2);
/// assert_eq!(chapters[1].title, "Two");
/// assert_eq!(chapters[1].filename, "chapter2.xhtml");
/// ```
#[derive(Debug, Clone)]
pub struct Decomposer {
    end_marker: String,
}
impl Default for Decomposer {
    fn default() -> Self {
        Self::new(DEFAULT_END_MARKER)
    }
}
impl Decomposer {
    /// Creates a decomposer that stops each section's content at `end_marker`.
    pub fn new(end_marker: impl Into<String>) -> Self {
        Self { end_marker: end_marker.into() }
    }

    pub fn end_marker(&self) -> &str {
        &self.end_marker
    }

    /// Extracts the body of `html` and splits it.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::MissingBody`](crate::error::ErrorKind::MissingBody) if
    ///   there is no `<body>...</body>`.
    /// - [`ErrorKind::UnterminatedHeading`](crate::error::ErrorKind::UnterminatedHeading)
    ///   if a heading is opened but not closed within its section.
    #[instrument(skip_all, fields(html_size = html.len(), chapters))]
    pub fn decompose(&self, html: &str) -> Result<Vec<Chapter>> {
        let body = scan::body(html)?;
        let chapters = self.decompose_body(body)?;
        tracing::Span::current().record("chapters", chapters.len());
        Ok(chapters)
    }

    /// Splits already-extracted body content.
    pub fn decompose_body(&self, body: &str) -> Result<Vec<Chapter>> {
        let end_marker = Finder::new(self.end_marker.as_bytes());
        let groups = scan::openings(body, 1);
        if let Some(first_group) = groups.first()
            && let Some(orphan) = scan::openings(&body[..*first_group], 2).first().copied()
        {
            tracing::warn!(offset = orphan, "Second-level heading found before any top-level heading; discarding it");
        }
        let mut chapters = Vec::new();
        for (i, &start) in groups.iter().enumerate() {
            // Each top-level section runs until the next top-level heading.
            let end = groups.get(i + 1).copied().unwrap_or(body.len());
            let group = scan::heading(body, 1, start, end)?;
            let name = &body[group.text_start..group.text_end];
            let sections = scan::openings(&body[group.end..end], 2);
            if sections.is_empty() {
                tracing::warn!(group = name, "Top-level section has no second-level headings; skipping it");
            }
            for (j, &relative) in sections.iter().enumerate() {
                let section_start = group.end + relative;
                let section_end = sections.get(j + 1).map(|next| group.end + next).unwrap_or(end);
                let section = scan::heading(body, 2, section_start, section_end)?;
                let content = Self::truncate(&body[section.end..section_end], &end_marker);
                if content.trim().is_empty() {
                    tracing::debug!(group = name, title = Self::title(body, &section), "Skipping empty section");
                    continue;
                }
                chapters.push(Chapter {
                    group: name.to_string(),
                    title: Self::title(body, &section).to_string(),
                    filename: Chapter::filename_for(chapters.len() + 1),
                    content: content.to_string(),
                });
            }
        }
        Ok(chapters)
    }

    fn title<'a>(body: &'a str, heading: &Heading) -> &'a str {
        &body[heading.text_start..heading.text_end]
    }

    /// Cuts section content at the end-of-book marker, if present.
    fn truncate<'a>(content: &'a str, end_marker: &Finder<'_>) -> &'a str {
        if end_marker.needle().is_empty() {
            return content;
        }
        match end_marker.find(content.as_bytes()) {
            Some(pos) => &content[..pos],
            None => content,
        }
    }
}
