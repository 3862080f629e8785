//! Best-effort HTML to XHTML clean-up for content cut out of a rendered page.
//!
//! This is not a well-formedness guarantee. It fixes the handful of things
//! that HTML generators routinely emit and XML parsers reject; anything
//! else passes through unchanged.

use crate::consts::{DOCTYPE_REGEX, TAG_REGEX, VOID_ELEMENT_REGEX};
use std::borrow::Cow;

/// Named entities that are valid HTML but undefined in XML, and the numeric
/// references they are rewritten to.
const ENTITIES: [(&str, &str); 2] = [("&nbsp;", "&#160;"), ("&copy;", "&#169;")];

/// Strips doctypes, self-closes void elements, and rewrites named entities
/// XML does not know about.
pub fn normalize(html: &str) -> String {
    let html = DOCTYPE_REGEX.replace_all(html, "");
    let html = VOID_ELEMENT_REGEX.replace_all(&html, "<$1$2 />");
    numeric_entities(&html).into_owned()
}

/// Reduces a heading's inner HTML to plain text suitable for `<title>` or a
/// navigation label. Existing entity references are kept as they are.
pub fn plain_text(html: &str) -> String {
    let text = TAG_REGEX.replace_all(html, "");
    numeric_entities(&text).split_whitespace().collect::<Vec<_>>().join(" ")
}

fn numeric_entities(html: &str) -> Cow<'_, str> {
    if !ENTITIES.iter().any(|(named, _)| html.contains(named)) {
        return Cow::Borrowed(html);
    }
    let mut html = html.to_string();
    for (named, numeric) in ENTITIES {
        html = html.replace(named, numeric);
    }
    Cow::Owned(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<p>a<br>b</p>", "<p>a<br />b</p>")]
    #[case("<p>a<br/>b</p>", "<p>a<br />b</p>")]
    #[case("<p>a<BR >b</p>", "<p>a<BR />b</p>")]
    #[case("<hr class=\"sep\">", "<hr class=\"sep\" />")]
    #[case("<img src=\"a.png\" alt=\"x\">", "<img src=\"a.png\" alt=\"x\" />")]
    #[case("<img src=\"a.png\" />", "<img src=\"a.png\" />")]
    #[case("<meta charset=\"utf-8\"><link rel=\"x\" href=\"y\">", "<meta charset=\"utf-8\" /><link rel=\"x\" href=\"y\" />")]
    #[case("<!DOCTYPE html>\n<p>x</p>", "<p>x</p>")]
    #[case("a&nbsp;b &copy; 2024 &amp; c", "a&#160;b &#169; 2024 &amp; c")]
    #[case("<header>not void</header><brand>no</brand>", "<header>not void</header><brand>no</brand>")]
    fn normalizes(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize(input), expected);
    }

    #[rstest]
    #[case("Plain", "Plain")]
    #[case("<a class=\"header\" href=\"#x\">Linked</a>", "Linked")]
    #[case("  Spaced \n out  ", "Spaced out")]
    #[case("Q&amp;A&nbsp;time", "Q&amp;A&#160;time")]
    fn plain_text_strips_markup(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(plain_text(input), expected);
    }
}
