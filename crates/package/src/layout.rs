//! Where every file lives inside the package, and the files whose content
//! never depends on the book.

pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
pub const OPS_NAMESPACE: &str = "http://www.idpf.org/2007/ops";
pub const OPF_NAMESPACE: &str = "http://www.idpf.org/2007/opf";
pub const DC_NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";

/// Name of the marker file that must be the first, uncompressed, archive entry.
pub const MIMETYPE: &str = "mimetype";
/// Exact content of [`MIMETYPE`], with no trailing newline.
pub const MIMETYPE_CONTENT: &str = "application/epub+zip";

pub const CONTAINER: &str = "META-INF/container.xml";
pub const DISPLAY_OPTIONS: &str = "META-INF/com.apple.ibooks.display-options.xml";
pub const PACKAGE_DOCUMENT: &str = "OEBPS/content.opf";
pub const NAVIGATION: &str = "OEBPS/nav.xhtml";
pub const STYLESHEET: &str = "OEBPS/styles/style.css";
pub const TEXT_DIR: &str = "OEBPS/text";

// Relative references, resolved from the package document's directory or
// from the chapter text directory.
pub(crate) const NAVIGATION_FROM_PACKAGE: &str = "nav.xhtml";
pub(crate) const STYLESHEET_FROM_PACKAGE: &str = "styles/style.css";
pub(crate) const TEXT_FROM_PACKAGE: &str = "text";
pub(crate) const STYLESHEET_FROM_TEXT: &str = "../styles/style.css";

/// `META-INF/container.xml`, pointing readers at the package document.
pub fn container() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="{PACKAGE_DOCUMENT}" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#
    )
}

/// Apple Books display options: embedded fonts allowed, right-to-left paging.
pub fn display_options() -> &'static str {
    r#"<?xml version="1.0" encoding="UTF-8"?>
<display_options>
  <platform name="*">
    <option name="specified-fonts">true</option>
    <option name="page-progression-direction">rtl</option>
  </platform>
</display_options>
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::assert_well_formed;

    #[test]
    fn static_documents_are_well_formed() {
        assert_well_formed(&container());
        assert_well_formed(display_options());
        assert!(container().contains(r#"full-path="OEBPS/content.opf""#));
    }

    #[test]
    fn relative_references_agree_with_layout() {
        assert_eq!(format!("OEBPS/{STYLESHEET_FROM_PACKAGE}"), STYLESHEET);
        assert_eq!(format!("OEBPS/{NAVIGATION_FROM_PACKAGE}"), NAVIGATION);
        assert_eq!(format!("OEBPS/{TEXT_FROM_PACKAGE}"), TEXT_DIR);
        assert_eq!(STYLESHEET_FROM_TEXT.trim_start_matches("../"), STYLESHEET_FROM_PACKAGE);
    }
}
