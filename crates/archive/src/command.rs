//! Archiver that shells out to the Info-ZIP `zip` and `unzip` tools.

use crate::error::{ErrorKind, Result};
use crate::{Archiver, Entry, Method};
use exn::ResultExt;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::instrument;

/// Uses whichever `zip`/`unzip` executables are on `PATH`.
///
/// Discovery happens once, up front; a missing tool is only reported when an
/// operation needs it, so extraction-free pipelines work without `unzip`.
#[derive(Debug, Clone)]
pub struct CommandArchiver {
    zip: Option<PathBuf>,
    unzip: Option<PathBuf>,
}

impl CommandArchiver {
    pub fn discover() -> Self {
        let find = |tool: &str| match which::which(tool) {
            Ok(path) => {
                tracing::trace!(tool, path = %path.display(), "Discovered executable");
                Some(path)
            },
            Err(_) => {
                tracing::info!(tool, "Executable not found in PATH");
                None
            },
        };
        Self {
            zip: find("zip"),
            unzip: find("unzip"),
        }
    }

    fn tool<'a>(path: Option<&'a PathBuf>, name: &'static str) -> Result<&'a PathBuf> {
        match path {
            Some(path) => Ok(path),
            None => exn::bail!(ErrorKind::ToolNotFound(name)),
        }
    }

    /// Argument lists for `zip`, one per run of entries sharing a method.
    /// The first run creates the archive; later runs append to it.
    fn invocations(entries: &[Entry], output: &Path) -> Vec<Vec<OsString>> {
        entries
            .chunk_by(|a, b| a.method == b.method)
            .map(|run| {
                let level = match run[0].method {
                    Method::Stored => "-0",
                    Method::Deflated => "-9",
                };
                let mut args: Vec<OsString> = ["-X", "-D", "-q", level].into_iter().map(OsString::from).collect();
                args.push(output.as_os_str().to_owned());
                args.extend(run.iter().map(|entry| OsString::from(&entry.name)));
                args
            })
            .collect()
    }

    fn run(tool: &'static str, command: &mut Command) -> Result<()> {
        let result = command.output().or_raise(|| ErrorKind::ToolNotFound(tool))?;
        if !result.status.success() {
            exn::bail!(ErrorKind::CommandFailed {
                tool,
                code: result.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

impl Archiver for CommandArchiver {
    fn name(&self) -> &str {
        "command"
    }

    #[instrument(skip(self), fields(archive = %archive.display(), destination = %destination.display()))]
    fn extract(&self, archive: &Path, destination: &Path) -> Result<()> {
        let unzip = Self::tool(self.unzip.as_ref(), "unzip")?;
        Self::run(
            "unzip",
            Command::new(unzip).arg("-q").arg("-o").arg(archive).arg("-d").arg(destination),
        )
    }

    #[instrument(skip(self, entries), fields(root = %root.display(), output = %output.display()))]
    fn create(&self, root: &Path, entries: &[Entry], output: &Path) -> Result<()> {
        let zip = Self::tool(self.zip.as_ref(), "zip")?;
        // `zip` runs from inside `root`, so the archive path must not be relative.
        let output = std::path::absolute(output).or_raise(|| ErrorKind::Io(output.to_path_buf()))?;
        for args in Self::invocations(entries, &output) {
            tracing::trace!(?args, "Running zip");
            Self::run("zip", Command::new(zip).current_dir(root).args(&args))?;
        }
        Ok(())
    }
}
