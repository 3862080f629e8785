//! Embedded assets for packaging.
//!
//! Stylesheets are embedded into the binary at compile time using
//! [`rust-embed`](rust_embed).

use crate::error::{ErrorKind, Result};
use exn::OptionExt;
use rust_embed::Embed;
use std::borrow::Cow;

/// Name of the stylesheet copied into every built book.
pub const BOOK_STYLESHEET: &str = "epub.css";

#[derive(Embed)]
#[folder = "../../assets/styles/"]
pub struct Builtins;
impl Builtins {
    /// Get the CSS content for a builtin style by name.
    pub fn load(name: impl AsRef<str>) -> Result<Cow<'static, [u8]>> {
        Self::get(name.as_ref())
            .map(|f| f.data)
            .ok_or_raise(|| ErrorKind::AssetNotFound(format!("builtin:{}", name.as_ref())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_load_book_style() {
        let css = Builtins::load(BOOK_STYLESHEET).unwrap();
        let css = String::from_utf8_lossy(&css);
        assert!(css.contains("direction: rtl"));
        assert!(css.contains("prefers-color-scheme: dark"));
    }

    #[test]
    fn missing_style_is_reported() {
        let err = Builtins::load("nope.css").unwrap_err();
        assert_eq!(*err, ErrorKind::AssetNotFound("builtin:nope.css".into()));
    }
}
