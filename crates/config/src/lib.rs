//! Layered configuration for the `folio` pipelines.
//!
//! Values come from, in increasing priority:
//! 1. compiled-in defaults,
//! 2. the user's `config.toml` in the platform configuration directory,
//! 3. `folio.toml` in the working directory,
//! 4. a file named on the command line (TOML, YAML or JSON, by extension).
//!
//! Layers 2 and 3 are skipped when absent.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Format, Json, Serialized, Toml, Yaml};
pub use folio_package::Metadata;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Name of the configuration file picked up from the working directory.
pub const LOCAL_CONFIG: &str = "folio.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub metadata: Metadata,
    pub patch: PatchConfig,
    pub build: BuildConfig,
    pub archiver: ArchiverKind,
}

/// Settings for rewriting the metadata of an existing EPUB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatchConfig {
    pub input: PathBuf,
    /// Appended to the input's file stem to name the patched copy.
    pub suffix: String,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("book.epub"),
            suffix: "_updated".to_string(),
        }
    }
}

/// Settings for assembling an EPUB from a rendered single-page HTML book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    pub html: PathBuf,
    /// Command (and arguments) run to produce `html` when it is missing.
    /// Empty disables generation.
    pub generate: Vec<String>,
    pub output_dir: PathBuf,
    /// `upon` template for the output file stem.
    pub name: String,
    /// Literal separating the last chapter's content from trailing matter.
    pub end_marker: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            html: PathBuf::from("book/print.html"),
            generate: vec!["mdbook".to_string(), "build".to_string()],
            output_dir: PathBuf::from("."),
            name: "{{ title|slug }}-{{ date }}".to_string(),
            end_marker: folio_extract::DEFAULT_END_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiverKind {
    /// In-process zip writer.
    #[default]
    Native,
    /// External `zip` and `unzip` executables.
    Command,
}

impl Config {
    /// Loads configuration, layering the user and working directory files and
    /// then `explicit` over the defaults.
    ///
    /// Unlike the implicit files, an explicit file must exist.
    #[instrument(skip_all, fields(explicit = ?explicit))]
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut implicit = Vec::with_capacity(2);
        if let Some(dirs) = ProjectDirs::from("", "", "folio") {
            implicit.push(dirs.config_dir().join("config.toml"));
        }
        implicit.push(PathBuf::from(LOCAL_CONFIG));
        Self::load_from(&implicit, explicit)
    }

    fn load_from(implicit: &[PathBuf], explicit: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        for path in implicit.iter().filter(|path| path.is_file()) {
            tracing::debug!(path = %path.display(), "Merging configuration file");
            figment = figment.merge(Toml::file_exact(path));
        }
        if let Some(path) = explicit {
            if !path.is_file() {
                exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
            }
            tracing::debug!(path = %path.display(), "Merging configuration file");
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("toml") => figment.merge(Toml::file_exact(path)),
                Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path)),
                Some("json") => figment.merge(Json::file_exact(path)),
                _ => exn::bail!(ErrorKind::UnsupportedFormat(path.to_path_buf())),
            };
        }
        figment.extract().or_raise(|| ErrorKind::Load)
    }

    /// Rejects configurations the pipelines cannot produce a valid book from.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("metadata.title", self.metadata.title.as_str()),
            ("metadata.language", self.metadata.language.as_str()),
            ("metadata.identifier", self.metadata.identifier.as_str()),
            ("patch.suffix", self.patch.suffix.as_str()),
            ("build.end_marker", self.build.end_marker.as_str()),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                exn::bail!(ErrorKind::Invalid(field));
            }
        }
        Ok(())
    }
}
