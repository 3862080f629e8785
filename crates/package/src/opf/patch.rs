//! Metadata substitution for existing package documents.
//!
//! Substitution works on the document text rather than on a parsed tree, so
//! everything outside the fields being replaced (comments, ordering,
//! whitespace, vendor metadata) survives byte for byte. Only the content of
//! the `<metadata>` block is ever modified.

use crate::Metadata;
use crate::consts::{EPUB2_REGEX, ID_ATTRIBUTE_REGEX, METADATA_CLOSE_REGEX, METADATA_OPEN_REGEX, dc_element_regex};
use crate::error::{ErrorKind, Result};
use crate::opf::{dc_element, translator_elements};
use exn::OptionExt;
use regex::Regex;
use std::sync::LazyLock;
use tracing::instrument;

/// Dublin Core elements that are rewritten on every patch, in order.
pub const REPLACED_FIELDS: [&str; 7] = ["title", "creator", "language", "publisher", "rights", "description", "subject"];

/// Literal whose presence means a translator has already been recorded.
const TRANSLATOR_MARKER: &str = r#"id="translator""#;
/// Literal whose presence means a publication date has already been recorded.
const DATE_MARKER: &str = "<dc:date";

static FIELD_REGEXES: LazyLock<Vec<(&'static str, Regex)>> =
    LazyLock::new(|| REPLACED_FIELDS.iter().map(|name| (*name, dc_element_regex(name))).collect());

/// Rewrites the metadata of a package document.
///
/// - Each of [`REPLACED_FIELDS`] ends up appearing exactly once in the
///   metadata block, holding the new value. The first existing element is
///   replaced in place (keeping its `id`, so refinements still resolve),
///   later duplicates are removed, and a missing element is appended just
///   before the block's closing tag.
/// - A translator and a publication date are only added when the document
///   does not already carry one, so patching twice gives the same output as
///   patching once.
///
/// # Errors
///
/// Returns [`ErrorKind::MissingMetadataSection`] if the document has no
/// `<metadata>...</metadata>` block.
#[instrument(skip_all, fields(document_size = document.len()))]
pub fn patch(document: &str, metadata: &Metadata) -> Result<String> {
    let close = METADATA_CLOSE_REGEX.find(document).ok_or_raise(|| ErrorKind::MissingMetadataSection)?;
    let open = METADATA_OPEN_REGEX
        .find(&document[..close.start()])
        .ok_or_raise(|| ErrorKind::MissingMetadataSection)?;
    let mut block = document[open.end()..close.start()].to_string();

    for (name, regex) in FIELD_REGEXES.iter() {
        block = replace_field(&block, name, regex, field_value(metadata, name));
    }
    if !metadata.translator.is_empty() && !document.contains(TRANSLATOR_MARKER) {
        tracing::debug!(translator = %metadata.translator, "Adding translator");
        for element in translator_elements(&metadata.translator, EPUB2_REGEX.is_match(document)) {
            append(&mut block, &element);
        }
    }
    if !metadata.date.is_empty() && !document.contains(DATE_MARKER) {
        tracing::debug!(date = %metadata.date, "Adding publication date");
        append(&mut block, &dc_element("date", &metadata.date, None));
    }

    let mut patched = String::with_capacity(document.len() + block.len());
    patched.push_str(&document[..open.end()]);
    patched.push_str(&block);
    patched.push_str(&document[close.start()..]);
    Ok(patched)
}

fn field_value<'a>(metadata: &'a Metadata, name: &str) -> &'a str {
    match name {
        "title" => &metadata.title,
        "creator" => &metadata.author,
        "language" => &metadata.language,
        "publisher" => &metadata.publisher,
        "rights" => &metadata.rights,
        "description" => &metadata.description,
        "subject" => &metadata.subject,
        _ => "",
    }
}

/// Replaces the first `dc:{name}` element of `block`, drops any others, or
/// appends one if there were none.
fn replace_field(block: &str, name: &str, regex: &Regex, value: &str) -> String {
    let mut patched = String::with_capacity(block.len());
    let mut last = 0;
    let mut replaced = false;
    for captures in regex.captures_iter(block) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        patched.push_str(&block[last..whole.start()]);
        last = whole.end();
        if replaced {
            tracing::debug!(field = name, "Removing duplicate metadata element");
            continue;
        }
        let id = captures
            .name("attrs")
            .and_then(|attrs| ID_ATTRIBUTE_REGEX.captures(attrs.as_str()))
            .and_then(|id| id.get(1))
            .map(|id| id.as_str());
        patched.push_str(captures.name("lead").map_or("", |m| m.as_str()));
        patched.push_str(&dc_element(name, value, id));
        patched.push_str(captures.name("trail").map_or("", |m| m.as_str()));
        replaced = true;
    }
    patched.push_str(&block[last..]);
    if !replaced {
        tracing::debug!(field = name, "Metadata element not found; inserting");
        append(&mut patched, &dc_element(name, value, None));
    }
    patched
}

/// Appends an element at the end of the metadata block, indented one level
/// deeper than the closing tag when the block is laid out one per line.
fn append(block: &mut String, element: &str) {
    let at = block.trim_end_matches([' ', '\t']).len();
    if block[..at].ends_with('\n') {
        let indent = format!("{}  ", &block[at..]);
        block.insert_str(at, &format!("{indent}{element}\n"));
    } else {
        block.push_str(element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{assert_well_formed, metadata};
    use rstest::rstest;

    const EPUB3: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:identifier id="uid">urn:uuid:1234</dc:identifier>
    <dc:title id="t1">Old Title</dc:title>
    <meta refines="#t1" property="title-type">main</meta>
    <dc:creator id="c1">Old Author</dc:creator>
    <dc:language>en</dc:language>
    <dc:subject>Old</dc:subject>
    <dc:subject>Older</dc:subject>
    <dc:description/>
    <meta property="dcterms:modified">2020-01-01T00:00:00Z</meta>
  </metadata>
  <manifest>
    <item id="nav" href="nav.xhtml" media-type="application/xhtml+xml" properties="nav"/>
  </manifest>
  <spine>
    <itemref idref="nav"/>
  </spine>
</package>
"##;

    const EPUB2: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="2.0" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
    <dc:title>Old</dc:title>
    <dc:date>2001-01-01</dc:date>
  </metadata>
  <manifest/>
  <spine/>
</package>
"#;

    fn block(document: &str) -> &str {
        let start = document.find("<metadata").unwrap();
        let end = document.find("</metadata>").unwrap();
        &document[start..end]
    }

    #[rstest]
    #[case(EPUB3)]
    #[case(EPUB2)]
    fn every_field_appears_exactly_once(#[case] document: &str) {
        let metadata = metadata();
        let patched = patch(document, &metadata).unwrap();
        for name in REPLACED_FIELDS {
            let regex = dc_element_regex(name);
            assert_eq!(regex.find_iter(&patched).count(), 1, "field {name} in\n{patched}");
            let expected = field_value(&metadata, name);
            assert!(patched.contains(&format!(">{expected}</dc:{name}>")), "field {name} in\n{patched}");
        }
        assert_well_formed(&patched);
    }

    #[test]
    fn replacement_keeps_ids_and_surroundings() {
        let patched = patch(EPUB3, &metadata()).unwrap();
        assert!(patched.contains(r#"    <dc:title id="t1">Book</dc:title>"#));
        assert!(patched.contains(r##"<meta refines="#t1" property="title-type">main</meta>"##));
        assert!(patched.contains(r#"<dc:creator id="c1">Author</dc:creator>"#));
        assert!(patched.contains(r#"<dc:identifier id="uid">urn:uuid:1234</dc:identifier>"#));
        assert!(patched.contains("<dc:description>Description</dc:description>"));
        assert!(!patched.contains("Older"));
        // Nothing outside the metadata block moves.
        assert_eq!(&patched[patched.find("</metadata>").unwrap()..], &EPUB3[EPUB3.find("</metadata>").unwrap()..]);
    }

    #[test]
    fn missing_fields_are_inserted_before_closing_tag() {
        let patched = patch(EPUB3, &metadata()).unwrap();
        let block = block(&patched);
        assert!(block.contains("    <dc:publisher>Publisher</dc:publisher>\n"));
        assert!(block.contains("    <dc:rights>Rights</dc:rights>\n"));
        assert!(block.ends_with("\n  "));
    }

    #[test]
    fn translator_and_date_are_added_once() {
        let once = patch(EPUB3, &metadata()).unwrap();
        assert_eq!(once.matches(r#"<dc:contributor id="translator">Translator</dc:contributor>"#).count(), 1);
        assert_eq!(once.matches(r##"<meta refines="#translator" property="role""##).count(), 1);
        assert_eq!(once.matches("<dc:date>2024-01-01</dc:date>").count(), 1);
        let twice = patch(&once, &metadata()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn repatching_with_new_values_updates_in_place() {
        let once = patch(EPUB3, &metadata()).unwrap();
        let mut changed = metadata();
        changed.title = "Second Edition".into();
        let twice = patch(&once, &changed).unwrap();
        assert!(twice.contains(r#"<dc:title id="t1">Second Edition</dc:title>"#));
        assert_eq!(twice.matches("<dc:title").count(), 1);
        assert_eq!(twice.len(), once.len() + "Second Edition".len() - "Book".len());
    }

    #[test]
    fn epub2_keeps_existing_date_and_uses_role_attribute() {
        let patched = patch(EPUB2, &metadata()).unwrap();
        assert!(patched.contains("<dc:date>2001-01-01</dc:date>"));
        assert!(!patched.contains("2024-01-01"));
        assert!(patched.contains(r#"<dc:contributor id="translator" opf:role="trl">Translator</dc:contributor>"#));
        assert!(!patched.contains("refines"));
        assert_well_formed(&patched);
    }

    #[test]
    fn values_are_escaped() {
        let mut metadata = metadata();
        metadata.publisher = "Smith & Sons <Ltd>".into();
        let patched = patch(EPUB3, &metadata).unwrap();
        assert!(patched.contains("<dc:publisher>Smith &amp; Sons &lt;Ltd&gt;</dc:publisher>"));
        assert_well_formed(&patched);
    }

    #[test]
    fn elements_outside_metadata_are_untouched() {
        let document = EPUB3.replace("</package>", "<!-- <dc:title>Comment</dc:title> -->\n</package>");
        let patched = patch(&document, &metadata()).unwrap();
        assert!(patched.contains("<!-- <dc:title>Comment</dc:title> -->"));
    }

    #[test]
    fn single_line_metadata_block() {
        let document = r#"<package><metadata><dc:title>x</dc:title></metadata></package>"#;
        let patched = patch(document, &metadata()).unwrap();
        assert!(patched.starts_with("<package><metadata><dc:title>Book</dc:title><dc:creator>Author</dc:creator>"));
        assert!(patched.ends_with("</metadata></package>"));
    }

    #[test]
    fn prefixed_metadata_block() {
        let document = "<opf:package><opf:metadata>\n</opf:metadata></opf:package>";
        let patched = patch(document, &metadata()).unwrap();
        assert!(patched.contains("<dc:title>Book</dc:title>"));
        assert!(patched.ends_with("</opf:metadata></opf:package>"));
    }

    #[rstest]
    #[case("<package><manifest/></package>")]
    #[case("<package><metadata></package>")]
    #[case("")]
    fn missing_metadata_section(#[case] document: &str) {
        let err = patch(document, &metadata()).unwrap_err();
        assert_eq!(*err, ErrorKind::MissingMetadataSection);
    }
}
