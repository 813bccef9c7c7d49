use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{Context, Result, anyhow};

/// Editor used when neither `--editor` nor `$EDITOR` names one.
pub const DEFAULT_EDITOR: &str = "vim";

/// Open `editor` on a scratch file seeded with `initial` and return the edited text.
///
/// Refuses to run when the scratch file already exists, and never removes it:
/// the caller deletes it once the edit has been applied.
pub fn edit_in_editor(scratch: &Path, initial: &str, editor: &str) -> Result<String> {
    if scratch.exists() {
        return Err(anyhow!(
            "Temp file '{}' already exists.\nIf it doesn't contain anything important, delete it.",
            scratch.display()
        ));
    }
    fs::write(scratch, format!("{initial}\n"))
        .with_context(|| format!("failed to write {}", scratch.display()))?;

    let mut parts = editor.split_whitespace();
    let program = parts.next().unwrap_or(DEFAULT_EDITOR);
    tracing::debug!(editor = program, scratch = %scratch.display(), "launching editor");
    let status = Command::new(program)
        .args(parts)
        .arg(scratch)
        .status()
        .with_context(|| format!("failed to launch editor '{}'", editor))?;
    if !status.success() {
        tracing::warn!(%status, editor = program, "editor exited unsuccessfully");
    }

    fs::read_to_string(scratch).with_context(|| format!("failed to read {}", scratch.display()))
}
