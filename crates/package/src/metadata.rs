/// Book-level metadata written into (or patched into) the package document.
///
/// Every field is plain text; escaping happens when it is written out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Metadata {
    pub title: String,
    /// Written as `dc:creator`.
    pub author: String,
    /// Written as a `dc:contributor` with the `trl` relator role. Left out when empty.
    pub translator: String,
    /// BCP 47 language tag, also used for `xml:lang` on every page.
    pub language: String,
    pub publisher: String,
    pub rights: String,
    pub description: String,
    pub subject: String,
    /// Publication date, as it should appear in `dc:date`.
    pub date: String,
    /// Unique identifier of the book (`dc:identifier`).
    pub identifier: String,
}
