//! `markassist random`: choose the next script to mark.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use markassist::pick_unmarked;

use crate::cli::common::GlobalArgs;
use crate::cli::utils::open_workspace;

/// Arguments for `markassist random`.
#[derive(Args, Debug)]
pub struct RandomArgs {
    /// Only consider scripts from these groups, e.g. P01 P02.
    pub groups: Vec<String>,
}

pub fn handle(args: RandomArgs, global: &GlobalArgs) -> Result<()> {
    let workspace = open_workspace(global)?;
    let mut rng = rand::thread_rng();
    match pick_unmarked(workspace.scripts()?, &args.groups, &mut rng) {
        Some(script) => println!("{}", script.filename()),
        None => println!("{}", r"All done! \o/".green().bold()),
    }
    Ok(())
}
