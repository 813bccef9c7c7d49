//! Command-line interface wiring for the `markassist` binary.
//!
//! This module owns the clap definitions and delegates execution to one
//! submodule per subcommand.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod common;
pub mod export;
pub mod init;
pub mod list;
pub mod mark;
pub mod random;
pub mod status;
pub mod utils;

use common::GlobalArgs;

/// Parsed CLI entrypoint for the `markassist` binary.
#[derive(Parser, Debug)]
#[command(name = "markassist", version, about = "Marking assistant")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialise the marks file with every script found on disk.
    Init(init::InitArgs),
    /// Show summary of which scripts are marked/unmarked.
    Status(status::StatusArgs),
    /// Pick a random unmarked script to mark next.
    Random(random::RandomArgs),
    /// Mark a student's script in the editor.
    Mark(mark::MarkArgs),
    /// List all student names in a given group.
    List(list::ListArgs),
    /// Write the student's mark and comments into their file.
    Export(export::ExportArgs),
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    let global = cli.global;
    match cli.command {
        Command::Init(args) => init::handle(args, &global),
        Command::Status(args) => status::handle(args, &global),
        Command::Random(args) => random::handle(args, &global),
        Command::Mark(args) => mark::handle(args, &global),
        Command::List(args) => list::handle(args, &global),
        Command::Export(args) => export::handle(args, &global),
    }
}
