//! `markassist init`: register scripts found on disk.

use anyhow::Result;
use clap::Args;
use markassist::register_new_scripts;

use crate::cli::common::GlobalArgs;
use crate::cli::utils::open_workspace;

/// Arguments for `markassist init`.
#[derive(Args, Debug)]
pub struct InitArgs {}

pub fn handle(_args: InitArgs, global: &GlobalArgs) -> Result<()> {
    let mut workspace = open_workspace(global)?;
    let added = register_new_scripts(&mut workspace)?;
    if added.is_empty() {
        println!("No new scripts found.");
    }
    for filename in &added {
        println!("Found new script: {}", filename);
    }
    workspace.save()?;
    tracing::info!(new = added.len(), marks = %workspace.marks_path().display(), "initialised");
    Ok(())
}
