//! Convenience helpers shared across command handlers.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use markassist::Workspace;

use crate::cli::common::GlobalArgs;

/// Open the workspace named by the global options.
pub fn open_workspace(global: &GlobalArgs) -> Result<Workspace> {
    Workspace::open(&global.marks_file, &global.checklist_file)
}

/// Persist a string either to a file or stdout when `-` is provided.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if path.as_os_str() == "-" {
        io::stdout().write_all(content.as_bytes())?;
        return Ok(());
    }
    fs::write(path, content).with_context(|| format!("failed to write {}", path.display()))
}
