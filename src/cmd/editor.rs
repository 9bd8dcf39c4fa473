//! External editor invocation

use std::path::Path;
use std::process::Command;

use log::debug;
use zett_note::error::{Error, Result};

/// Run `editor` on `path` and wait for it to exit
///
/// The editor string may carry arguments (e.g. `code --wait`).
pub fn open(editor: &str, path: &Path) -> Result<()> {
    let mut parts = editor.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| Error::Editor("no editor configured".to_string()))?;

    debug!("running {} on {}", editor, path.display());
    let status = Command::new(program)
        .args(parts)
        .arg(path)
        .status()
        .map_err(|e| Error::Editor(format!("{}: {}", program, e)))?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::Editor(format!("{} exited with {}", program, status)))
    }
}
