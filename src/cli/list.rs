//! `markassist list`: student names for one group.

use anyhow::{Context, Result};
use clap::Args;
use markassist::group_scripts;
use rand::rngs::ThreadRng;

use crate::cli::common::GlobalArgs;
use crate::cli::utils::open_workspace;

/// Arguments for `markassist list`.
///
/// Handy for writing names on the whiteboard at the start of a practical.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// Group id, e.g. P01.
    pub group: String,
    /// List in random order instead of by student number.
    #[arg(long)]
    pub random: bool,
}

pub fn handle(args: ListArgs, global: &GlobalArgs) -> Result<()> {
    let workspace = open_workspace(global)?;
    let mut rng = rand::thread_rng();
    let rng: Option<&mut ThreadRng> = args.random.then_some(&mut rng);
    for script in group_scripts(workspace.scripts()?, &args.group, rng) {
        let name = script
            .student_name(workspace.root())
            .with_context(|| format!("cannot list {}", script.filename()))?;
        let id = script
            .student_id(workspace.root())
            .with_context(|| format!("cannot list {}", script.filename()))?;
        println!("{:<30}{}", name, id);
    }
    Ok(())
}
