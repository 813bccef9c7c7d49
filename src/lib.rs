//! Core library for tracking, editing and exporting marks on student scripts.

mod checklist;
mod discovery;
mod editor;
mod export;
mod report;
mod script;
mod template;
mod workspace;

pub use checklist::{
    CheckState, Checklist, ChecklistEntry, ChecklistError, ChecklistSchema, ChecklistSection,
    SchemaSection,
};
pub use discovery::discover_scripts;
pub use editor::{DEFAULT_EDITOR, edit_in_editor};
pub use export::{COMMENTS_PLACEHOLDER, ExportError, MARK_PLACEHOLDER, export_script};
pub use report::{RowKind, STATUS_HEADER, StatusReport, StatusRow, group_scripts, pick_unmarked};
pub use script::{Script, ScriptError, ScriptSet};
pub use template::{MarkEdit, SEPARATOR, TemplateError, parse_template, render_template};
pub use workspace::{CHECKLIST_FILE, EDITOR_FILE, MARKS_FILE, Workspace};

use std::fs;

use anyhow::{Context, Result, anyhow};

/// Scan the workspace root and register scripts not yet in the marks file.
pub fn register_new_scripts(workspace: &mut Workspace) -> Result<Vec<String>> {
    let found = discover_scripts(workspace.root())?;
    workspace.register(found)
}

/// Collect marks for `filename` through the editor and save them.
///
/// The scratch file is removed only once the marks file has been written.
/// When the edited text does not parse, it is left on disk and nothing is
/// recorded.
pub fn mark_script(workspace: &mut Workspace, filename: &str, editor: &str) -> Result<()> {
    let schema = workspace.checklist_schema()?;
    let initial = render_template(workspace.script(filename)?, schema.as_ref());

    let scratch = workspace.scratch_path();
    let text = edit_in_editor(&scratch, &initial, editor)?;
    let edit = parse_template(&text, schema.as_ref()).map_err(|err| {
        anyhow!(
            "{}\n\nEdits are saved in the file: {}\nExiting without applying changes...",
            err,
            scratch.display()
        )
    })?;
    if let Some(checklist) = &edit.checklist {
        let (checked, unchecked, not_applicable) = checklist.tally();
        tracing::info!(checked, unchecked, not_applicable, "checklist recorded");
    }
    let changed = workspace.script_mut(filename)?.update(edit);
    workspace.save().with_context(|| {
        format!("Edits are saved in the file: {}", scratch.display())
    })?;
    tracing::info!(script = filename, changed, "marks saved");

    fs::remove_file(&scratch)
        .with_context(|| format!("failed to remove {}", scratch.display()))?;
    Ok(())
}
