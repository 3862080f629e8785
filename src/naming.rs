//! Output file naming.
//!
//! Built EPUBs are named by an [upon] template rendered against the book
//! metadata. Available variables are `title`, `author`, `language`,
//! `identifier` and `date` (the build date, `YYYY-MM-DD` in UTC), plus a
//! `slug` formatter:
//!
//! ```
//! use folio::naming::ArchiveName;
//! use folio_package::Metadata;
//! use time::macros::date;
//!
//! let name: ArchiveName = "{{ title|slug }}-{{ date }}".parse().unwrap();
//! let metadata = Metadata { title: "The \"Long\" Road".into(), ..Metadata::default() };
//! assert_eq!(name.render(&metadata, date!(2024 - 03 - 09)).unwrap(), "the-long-road-2024-03-09.epub");
//! ```

use crate::error::{Error, ErrorKind, Result};
use exn::ResultExt;
use folio_package::Metadata;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use time::Date;
use time::macros::format_description;
use upon::{Engine, Template};

pub const EXTENSION: &str = "epub";

/// A compiled output name template.
pub struct ArchiveName {
    engine: Engine<'static>,
    template: Template<'static>,
}

impl FromStr for ArchiveName {
    type Err = Error;

    /// Returns [`ErrorKind::Template`] if the template syntax is invalid.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        let template = engine.compile(s.to_string()).or_raise(|| ErrorKind::Template)?;
        Ok(Self { engine, template })
    }
}

impl ArchiveName {
    /// Renders the file name, extension included.
    ///
    /// The rendered stem must be a single, non-empty path component.
    pub fn render(&self, metadata: &Metadata, date: Date) -> Result<String> {
        let date = date.format(format_description!("[year]-[month]-[day]")).or_raise(|| ErrorKind::Template)?;
        let stem = self
            .template
            .render(
                &self.engine,
                upon::value! {
                    title: &metadata.title,
                    author: &metadata.author,
                    language: &metadata.language,
                    identifier: &metadata.identifier,
                    date: date,
                },
            )
            .to_string()
            .or_raise(|| ErrorKind::Template)?;
        let stem = stem.trim();
        if stem.is_empty() || stem == "." || stem == ".." || stem.contains(['/', '\\']) {
            exn::bail!(ErrorKind::Template);
        }
        Ok(format!("{stem}.{EXTENSION}"))
    }
}

/// Name of a patched copy: `<stem><suffix>.epub`, beside `input`.
pub fn patched(input: &Path, suffix: &str) -> PathBuf {
    let stem = input.file_stem().map(|stem| stem.to_string_lossy()).unwrap_or_default();
    input.with_file_name(format!("{stem}{suffix}.{EXTENSION}"))
}

/// Custom [`upon`] extensions.
mod addons {
    use rslug::slugify;
    use std::fmt::Write;
    use upon::{Engine, Value, fmt as upon_fmt};

    /// Converts strings to file-name-safe slugs, dropping quotation marks first
    /// so `"hello"` does not become `-hello-`.
    fn slug_formatter(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => {
                let marks = [
                    '\u{0027}', '\u{0022}', '\u{2018}', '\u{2019}', '\u{201C}', '\u{201D}', '\u{201E}', '\u{05F3}',
                    '\u{05F4}', '\u{00AB}', '\u{00BB}',
                ];
                let stripped: String = s.chars().filter(|c| !marks.contains(c)).collect();
                write!(f, "{}", slugify!(&stripped))?
            },
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.add_formatter("slug", slug_formatter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use time::macros::date;

    fn metadata() -> Metadata {
        Metadata {
            title: "Rust in Action".into(),
            author: "Jane Doe".into(),
            language: "he".into(),
            identifier: "urn:isbn:1234".into(),
            ..Metadata::default()
        }
    }

    #[rstest]
    #[case::default("{{ title|slug }}-{{ date }}", "rust-in-action-2024-01-31.epub")]
    #[case::author("{{ author|slug }}_{{ title|slug }}", "jane-doe_rust-in-action.epub")]
    #[case::literal("book", "book.epub")]
    #[case::language("{{ title|slug }}.{{ language }}", "rust-in-action.he.epub")]
    fn renders(#[case] template: &str, #[case] expected: &str) {
        let name: ArchiveName = template.parse().unwrap();
        assert_eq!(name.render(&metadata(), date!(2024 - 01 - 31)).unwrap(), expected);
    }

    #[rstest]
    #[case::syntax("{{ title")]
    #[case::unknown_formatter("{{ title|shout }}")]
    #[case::unknown_variable("{{ subtitle }}")]
    #[case::empty("   ")]
    #[case::separator("{{ language }}/{{ title|slug }}")]
    #[case::parent("..")]
    fn rejects(#[case] template: &str) {
        let err = template
            .parse::<ArchiveName>()
            .and_then(|name| name.render(&metadata(), date!(2024 - 01 - 31)))
            .unwrap_err();
        assert_eq!(*err, ErrorKind::Template);
    }

    #[rstest]
    #[case::plain("book.epub", "_updated", "book_updated.epub")]
    #[case::nested("dir/sub/book.epub", "-v2", "dir/sub/book-v2.epub")]
    #[case::other_extension("book.zip", "_updated", "book_updated.epub")]
    fn patched_names(#[case] input: &str, #[case] suffix: &str, #[case] expected: &str) {
        assert_eq!(patched(Path::new(input), suffix), PathBuf::from(expected));
    }
}
