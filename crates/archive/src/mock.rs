//! Recording archiver for testing.

use crate::error::{ErrorKind, Result};
use crate::{Archiver, Entry};
use exn::ResultExt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// An operation received by a [`MockArchiver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Extract { archive: PathBuf, destination: PathBuf },
    Create { root: PathBuf, entries: Vec<Entry>, output: PathBuf },
}

/// Archiver that records every call and touches the filesystem as little as
/// a caller can observe.
///
/// `extract` writes the configured files into the destination; `create`
/// writes a placeholder file at the output path listing the entry names.
/// A failing mock returns [`ErrorKind::CommandFailed`] from both operations
/// without writing anything.
#[derive(Debug, Default)]
pub struct MockArchiver {
    files: Vec<(String, Vec<u8>)>,
    fail: bool,
    calls: Mutex<Vec<Call>>,
}

impl MockArchiver {
    /// A mock whose archives "contain" the given files.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<String>, impl Into<Vec<u8>>)>) -> Self {
        Self {
            files: files.into_iter().map(|(name, data)| (name.into(), data.into())).collect(),
            ..Self::default()
        }
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    fn record(&self, call: Call) -> Result<()> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
        if self.fail {
            exn::bail!(ErrorKind::CommandFailed {
                tool: "mock",
                code: 1,
                stderr: "configured to fail".to_string(),
            });
        }
        Ok(())
    }
}

impl Archiver for MockArchiver {
    fn name(&self) -> &str {
        "mock"
    }

    fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        self.record(Call::Extract {
            archive: archive.to_path_buf(),
            destination: destination.to_path_buf(),
        })?;
        for (name, data) in &self.files {
            let path = destination.join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).or_raise(|| ErrorKind::Io(parent.to_path_buf()))?;
            }
            fs::write(&path, data).or_raise(|| ErrorKind::Io(path.clone()))?;
        }
        Ok(())
    }

    fn create(&self, root: &Path, entries: &[Entry], output: &Path) -> Result<()> {
        self.record(Call::Create {
            root: root.to_path_buf(),
            entries: entries.to_vec(),
            output: output.to_path_buf(),
        })?;
        let listing: Vec<&str> = entries.iter().map(|entry| entry.name.as_str()).collect();
        fs::write(output, listing.join("\n")).or_raise(|| ErrorKind::Io(output.to_path_buf()))?;
        Ok(())
    }
}
