//! Running the external site generator that renders the source HTML.

use crate::error::{ErrorKind, Result};
use exn::{OptionExt, ResultExt};
use std::path::Path;
use std::process::Command;
use tracing::instrument;

/// Ensures `html` exists, running `command` to produce it if it does not.
///
/// An empty `command` disables generation. Fails with
/// [`ErrorKind::Generator`] if the program is missing or exits unsuccessfully,
/// and with [`ErrorKind::MissingInput`] if `html` is still absent afterwards.
#[instrument(skip_all, fields(html = %html.display()))]
pub fn ensure_html(html: &Path, command: &[String]) -> Result<()> {
    if html.is_file() {
        return Ok(());
    }
    if let Some((program, args)) = command.split_first() {
        tracing::info!(program = %program, "HTML not found; running site generator");
        let path = which::which(program).or_raise(|| ErrorKind::Generator(program.clone()))?;
        let output = Command::new(&path).args(args).output().or_raise(|| ErrorKind::Generator(program.clone()))?;
        if !output.status.success() {
            tracing::error!(
                code = output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Site generator failed"
            );
            exn::bail!(ErrorKind::Generator(program.clone()));
        }
    }
    html.is_file().then_some(()).ok_or_raise(|| ErrorKind::MissingInput(html.to_path_buf()))
}
