//! `markassist mark`: the editor round trip.

use anyhow::Result;
use clap::Args;
use markassist::mark_script;

use crate::cli::common::GlobalArgs;
use crate::cli::utils::open_workspace;

/// Arguments for `markassist mark`.
#[derive(Args, Debug)]
pub struct MarkArgs {
    /// Script to mark, as listed by `status` (e.g. P01/s123.py).
    pub script: String,
}

pub fn handle(args: MarkArgs, global: &GlobalArgs) -> Result<()> {
    let mut workspace = open_workspace(global)?;
    mark_script(&mut workspace, &args.script, &global.editor)
}
