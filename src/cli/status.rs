//! `markassist status`: marked/unmarked summary.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use markassist::{RowKind, STATUS_HEADER, StatusReport};

use crate::cli::common::GlobalArgs;
use crate::cli::utils::open_workspace;

/// Arguments for `markassist status`.
#[derive(Args, Debug)]
pub struct StatusArgs {}

pub fn handle(_args: StatusArgs, global: &GlobalArgs) -> Result<()> {
    let workspace = open_workspace(global)?;
    let report = StatusReport::build(workspace.scripts()?);
    println!("{}", STATUS_HEADER);
    for row in &report.rows {
        match row.kind {
            RowKind::Marked => println!("{}", row.text.green().bold()),
            RowKind::Unmarked => println!("{}", row.text.red().bold()),
        }
    }
    println!("{}", report.summary().yellow().bold());
    Ok(())
}
