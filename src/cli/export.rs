//! `markassist export`: write marks into the student's script.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use markassist::export_script;

use crate::cli::common::GlobalArgs;
use crate::cli::utils::{open_workspace, write_output};

/// Arguments for `markassist export`.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Script to export, e.g. P01/s123.py.
    pub script: String,
    /// Write here instead of back into the script (`-` for stdout).
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

pub fn handle(args: ExportArgs, global: &GlobalArgs) -> Result<()> {
    let workspace = open_workspace(global)?;
    let script = workspace.script(&args.script)?;
    let source = script.read_source(workspace.root())?;
    let exported = export_script(script, &source)?;
    let target = args
        .output
        .unwrap_or_else(|| script.path_in(workspace.root()));
    write_output(&target, &exported)?;
    if target.as_os_str() != "-" {
        println!("Exported {} -> {}", script.filename(), target.display());
    }
    Ok(())
}
