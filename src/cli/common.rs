//! Options shared by every subcommand.

use std::path::PathBuf;

use clap::Args;
use markassist::{CHECKLIST_FILE, DEFAULT_EDITOR, MARKS_FILE};

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Marks file; its directory is the root scripts are found under.
    #[arg(long, global = true, env = "MARKS_FILE", default_value = MARKS_FILE)]
    pub marks_file: PathBuf,
    /// Checklist schema, relative to the marks file's directory.
    #[arg(long, global = true, env = "CHECKLIST_FILE", default_value = CHECKLIST_FILE)]
    pub checklist_file: PathBuf,
    /// Editor command used by `mark`.
    #[arg(long, global = true, env = "EDITOR", default_value = DEFAULT_EDITOR)]
    pub editor: String,
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
