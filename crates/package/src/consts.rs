use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

regex!(DOCTYPE_REGEX, r"(?i)<!doctype[^>]*>\s*");
regex!(VOID_ELEMENT_REGEX, r"(?i)<(br|hr|img|meta|link)\b([^>]*?)\s*/?>");
regex!(TAG_REGEX, r"<[^>]*>");
regex!(METADATA_OPEN_REGEX, r"<(?:[A-Za-z_][\w.-]*:)?metadata\b[^>]*>");
regex!(METADATA_CLOSE_REGEX, r"</(?:[A-Za-z_][\w.-]*:)?metadata\s*>");
regex!(EPUB2_REGEX, r#"<(?:opf:)?package\b[^>]*\bversion\s*=\s*["']2"#);
regex!(ID_ATTRIBUTE_REGEX, r#"\bid\s*=\s*["']([^"']*)["']"#);

/// Matches one complete `dc:{name}` element, either self-closing or with
/// content, along with the horizontal whitespace before it and the line
/// break after it.
pub(crate) fn dc_element_regex(name: &str) -> Regex {
    let pattern = format!(
        r"(?s)(?P<lead>[ \t]*)<dc:{name}\b(?P<attrs>[^>]*?)(?:/>|>.*?</dc:{name}\s*>)(?P<trail>[ \t]*\r?\n)?"
    );
    // Infallible: `name` is always one of the fixed Dublin Core element names.
    Regex::new(&pattern).expect("valid dublin core element pattern")
}
