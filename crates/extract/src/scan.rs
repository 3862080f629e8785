//! Byte-level scanning for the literal markers emitted by the site generator.
//!
//! Every marker searched for here is ASCII, so any offset returned is a valid
//! `str` slice boundary.

use crate::error::{ErrorKind, Result};
use exn::OptionExt;
use memchr::memmem;

/// Returns the content between the first `<body ...>` and the first `</body>`
/// that follows it.
pub(crate) fn body(html: &str) -> Result<&str> {
    let bytes = html.as_bytes();
    let open = memmem::find(bytes, b"<body").ok_or_raise(|| ErrorKind::MissingBody)?;
    let start = memchr::memchr(b'>', &bytes[open..]).map(|gt| open + gt + 1).ok_or_raise(|| ErrorKind::MissingBody)?;
    let end = memmem::find(&bytes[start..], b"</body>").map(|pos| start + pos).ok_or_raise(|| ErrorKind::MissingBody)?;
    Ok(&html[start..end])
}

/// A heading located within a haystack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Heading {
    /// Offset of the `<` of the opening tag.
    pub start: usize,
    /// Offset of the first byte of heading text.
    pub text_start: usize,
    /// Offset of the `<` of the closing tag.
    pub text_end: usize,
    /// Offset of the first byte after the closing tag.
    pub end: usize,
}

/// Finds every opening tag of heading `level` in `haystack`.
///
/// A tag only counts when `<hN` is followed by `>` or whitespace, so `<h1x>`
/// or `<h10>` are not mistaken for headings.
pub(crate) fn openings(haystack: &str, level: u8) -> Vec<usize> {
    let needle = format!("<h{level}");
    let bytes = haystack.as_bytes();
    memmem::find_iter(bytes, needle.as_bytes())
        .filter(|&pos| bytes.get(pos + needle.len()).is_some_and(|b| *b == b'>' || b.is_ascii_whitespace()))
        .collect()
}

/// Resolves a heading opened at `start`, reading its text up to `</hN>`.
///
/// The closing tag is only searched for before `limit`.
pub(crate) fn heading(haystack: &str, level: u8, start: usize, limit: usize) -> Result<Heading> {
    let bytes = &haystack.as_bytes()[..limit];
    let unterminated = || ErrorKind::UnterminatedHeading { level, offset: start };
    let text_start = memchr::memchr(b'>', &bytes[start..]).map(|gt| start + gt + 1).ok_or_raise(unterminated)?;
    let close = format!("</h{level}>");
    let text_end =
        memmem::find(&bytes[text_start..], close.as_bytes()).map(|pos| text_start + pos).ok_or_raise(unterminated)?;
    Ok(Heading {
        start,
        text_start,
        text_end,
        end: text_end + close.len(),
    })
}
