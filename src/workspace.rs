use crate::checklist::ChecklistSchema;
use crate::script::{Script, ScriptSet};
use std::fs::OpenOptions;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};

pub const MARKS_FILE: &str = "marks.json";
pub const CHECKLIST_FILE: &str = "checklist.json";
/// Scratch file the editor works on, kept after a failed edit.
pub const EDITOR_FILE: &str = ".mark-comment";

/// Marks file, checklist schema and scratch file of one marking session.
///
/// Script paths, the checklist file and the scratch file all resolve against
/// the directory that holds the marks file.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    marks_path: PathBuf,
    checklist_path: PathBuf,
    scripts: Option<ScriptSet>,
}

impl Workspace {
    /// Open the workspace, loading the marks file when it exists.
    pub fn open(marks_file: &Path, checklist_file: &Path) -> Result<Self> {
        let root = match marks_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let marks_path = marks_file.to_path_buf();
        let checklist_path = root.join(checklist_file);
        let scripts = if marks_path.exists() {
            Some(load_scripts(&marks_path)?)
        } else {
            None
        };
        Ok(Self {
            root,
            marks_path,
            checklist_path,
            scripts,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn marks_path(&self) -> &Path {
        &self.marks_path
    }

    pub fn scratch_path(&self) -> PathBuf {
        self.root.join(EDITOR_FILE)
    }

    pub fn is_initialised(&self) -> bool {
        self.scripts.is_some()
    }

    pub fn scripts(&self) -> Result<&ScriptSet> {
        self.scripts.as_ref().ok_or_else(not_initialised)
    }

    pub fn scripts_mut(&mut self) -> Result<&mut ScriptSet> {
        self.scripts.as_mut().ok_or_else(not_initialised)
    }

    /// Look up a script, failing when it is not in the marks file.
    pub fn script(&self, filename: &str) -> Result<&Script> {
        self.scripts()?
            .get(filename)
            .ok_or_else(|| anyhow!("No script {} in marks file.", filename))
    }

    pub fn script_mut(&mut self, filename: &str) -> Result<&mut Script> {
        self.scripts_mut()?
            .get_mut(filename)
            .ok_or_else(|| anyhow!("No script {} in marks file.", filename))
    }

    /// The checklist schema, or `None` when no schema file is present.
    pub fn checklist_schema(&self) -> Result<Option<ChecklistSchema>> {
        ChecklistSchema::load(&self.checklist_path)
    }

    /// Add newly discovered scripts, returning the filenames that were new.
    pub fn register<I>(&mut self, filenames: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = String>,
    {
        let scripts = self.scripts.get_or_insert_with(ScriptSet::new);
        let mut added = Vec::new();
        for filename in filenames {
            if scripts.contains(&filename) {
                continue;
            }
            scripts.add(Script::new(filename.clone())?);
            added.push(filename);
        }
        Ok(added)
    }

    /// Sort the scripts and write them back to the marks file.
    pub fn save(&mut self) -> Result<()> {
        let path = self.marks_path.clone();
        let scripts = self.scripts_mut()?;
        scripts.sort();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("failed to write marks file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &*scripts)
            .context("failed to serialize marks")?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        tracing::debug!(path = %path.display(), scripts = scripts.len(), "saved marks file");
        Ok(())
    }
}

fn load_scripts(path: &Path) -> Result<ScriptSet> {
    let file = OpenOptions::new()
        .read(true)
        .open(path)
        .with_context(|| format!("failed to open marks file {}", path.display()))?;
    let scripts: ScriptSet = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse marks file {}", path.display()))?;
    tracing::debug!(path = %path.display(), scripts = scripts.len(), "loaded marks file");
    Ok(scripts)
}

fn not_initialised() -> anyhow::Error {
    anyhow!("Marks file not found. Run `markassist init`")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_marks_file_is_uninitialised() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(&dir.path().join(MARKS_FILE), Path::new(CHECKLIST_FILE)).unwrap();
        assert!(!ws.is_initialised());
        let err = ws.scripts().unwrap_err();
        assert!(err.to_string().starts_with("Marks file not found"));
    }

    #[test]
    fn register_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let marks = dir.path().join(MARKS_FILE);
        let mut ws = Workspace::open(&marks, Path::new(CHECKLIST_FILE)).unwrap();
        let added = ws
            .register(["P02/s5.py".to_string(), "P01/s9.py".to_string()])
            .unwrap();
        assert_eq!(added, ["P02/s5.py", "P01/s9.py"]);
        ws.script_mut("P01/s9.py").unwrap().code_mark = Some(4);
        ws.save().unwrap();

        let mut reopened = Workspace::open(&marks, Path::new(CHECKLIST_FILE)).unwrap();
        let names: Vec<&str> = reopened
            .scripts()
            .unwrap()
            .iter()
            .map(Script::filename)
            .collect();
        assert_eq!(names, ["P01/s9.py", "P02/s5.py"]);
        assert_eq!(reopened.script("P01/s9.py").unwrap().code_mark, Some(4));

        let again = reopened
            .register(["P01/s9.py".to_string(), "P03/s1.py".to_string()])
            .unwrap();
        assert_eq!(again, ["P03/s1.py"]);
    }

    #[test]
    fn unknown_script_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let mut ws = Workspace::open(&dir.path().join(MARKS_FILE), Path::new(CHECKLIST_FILE)).unwrap();
        ws.register(Vec::<String>::new()).unwrap();
        let err = ws.script("P01/s1.py").unwrap_err();
        assert_eq!(err.to_string(), "No script P01/s1.py in marks file.");
    }

    #[test]
    fn corrupt_marks_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let marks = dir.path().join(MARKS_FILE);
        fs::write(&marks, "{not json").unwrap();
        let err = Workspace::open(&marks, Path::new(CHECKLIST_FILE)).unwrap_err();
        assert!(err.to_string().contains("failed to parse marks file"));
    }

    #[test]
    fn checklist_resolves_against_marks_directory() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(&dir.path().join(MARKS_FILE), Path::new(CHECKLIST_FILE)).unwrap();
        assert!(ws.checklist_schema().unwrap().is_none());
        fs::write(
            dir.path().join(CHECKLIST_FILE),
            r#"[{"header": "Style", "entries": ["Names"]}]"#,
        )
        .unwrap();
        let schema = ws.checklist_schema().unwrap().unwrap();
        assert_eq!(schema.sections()[0].header, "Style");
        assert_eq!(ws.scratch_path(), dir.path().join(EDITOR_FILE));
    }
}
