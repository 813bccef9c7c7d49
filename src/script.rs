use crate::checklist::Checklist;
use crate::template::MarkEdit;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

const NAME_TOKEN: &str = "Student Name:";
const ID_TOKEN: &str = "Student Number:";

static SCRIPT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(P\d{2})/s\d+\.py$").expect("valid script pattern"));

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Not a valid student's script: {0}")]
    InvalidFilename(String),
    #[error("duplicate script {0} in marks file")]
    Duplicate(String),
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{filename} doesn't contain the string '{token}'")]
    MissingToken {
        filename: String,
        token: &'static str,
    },
}

/// Marks and comments recorded for a single student's script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScriptRecord", into = "ScriptRecord")]
pub struct Script {
    filename: String,
    group: String,
    pub code_mark: Option<u32>,
    pub final_mark: Option<u32>,
    pub comments: String,
    pub meeting_comments: String,
    pub checklist: Option<Checklist>,
    pub marked_at: Option<DateTime<Utc>>,
}

impl Script {
    /// Create an unmarked script, deriving the group id from a `PNN/sNNN.py` path.
    pub fn new<S: Into<String>>(filename: S) -> Result<Self, ScriptError> {
        let filename = filename.into();
        let group = SCRIPT_PATTERN
            .captures(&filename)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| ScriptError::InvalidFilename(filename.clone()))?;
        Ok(Self {
            filename,
            group,
            code_mark: None,
            final_mark: None,
            comments: String::new(),
            meeting_comments: String::new(),
            checklist: None,
            marked_at: None,
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Practical/assignment group id, e.g. `P01`.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// A script counts as marked once its code mark is recorded.
    pub fn is_marked(&self) -> bool {
        self.code_mark.is_some()
    }

    pub fn has_edits(&self) -> bool {
        self.code_mark.is_some()
            || self.final_mark.is_some()
            || !self.comments.is_empty()
            || !self.meeting_comments.is_empty()
            || self.checklist.is_some()
    }

    /// Replace marks, comments and checklist with a freshly parsed edit.
    ///
    /// `marked_at` only moves when the edit changes something; returns whether
    /// it did.
    pub fn update(&mut self, edit: MarkEdit) -> bool {
        let checklist = edit.checklist.or_else(|| self.checklist.clone());
        let changed = self.code_mark != edit.code_mark
            || self.final_mark != edit.final_mark
            || self.comments != edit.comments
            || self.meeting_comments != edit.meeting_comments
            || self.checklist != checklist;
        if !changed {
            return false;
        }
        self.code_mark = edit.code_mark;
        self.final_mark = edit.final_mark;
        self.comments = edit.comments;
        self.meeting_comments = edit.meeting_comments;
        self.checklist = checklist;
        self.marked_at = Some(Utc::now());
        true
    }

    /// The final mark, or the code mark when no final mark is recorded.
    pub fn mark(&self) -> Option<u32> {
        self.final_mark.or(self.code_mark)
    }

    /// Location of the student's file below the workspace root.
    pub fn path_in(&self, root: &Path) -> PathBuf {
        root.join(&self.filename)
    }

    pub fn read_source(&self, root: &Path) -> Result<String, ScriptError> {
        let path = self.path_in(root);
        fs::read_to_string(&path).map_err(|source| ScriptError::Read { path, source })
    }

    /// Student name as written in the header of their script.
    pub fn student_name(&self, root: &Path) -> Result<String, ScriptError> {
        self.header_field(root, NAME_TOKEN)
    }

    /// Student number as written in the header of their script.
    pub fn student_id(&self, root: &Path) -> Result<String, ScriptError> {
        self.header_field(root, ID_TOKEN)
    }

    fn header_field(&self, root: &Path, token: &'static str) -> Result<String, ScriptError> {
        let source = self.read_source(root)?;
        field_after_token(&source, token).ok_or_else(|| ScriptError::MissingToken {
            filename: self.filename.clone(),
            token,
        })
    }
}

/// Text following `token` on the first line that contains it.
fn field_after_token(source: &str, token: &str) -> Option<String> {
    source
        .lines()
        .find_map(|line| line.split_once(token))
        .map(|(_, rest)| rest.trim().to_string())
}

/// On-disk shape of a [`Script`]; the group id is derived, not stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ScriptRecord {
    filename: String,
    #[serde(default)]
    code_mark: Option<u32>,
    #[serde(default)]
    final_mark: Option<u32>,
    #[serde(default)]
    comments: String,
    #[serde(default)]
    meeting_comments: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checklist: Option<Checklist>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    marked_at: Option<DateTime<Utc>>,
}

impl TryFrom<ScriptRecord> for Script {
    type Error = ScriptError;

    fn try_from(record: ScriptRecord) -> Result<Self, Self::Error> {
        let mut script = Script::new(record.filename)?;
        script.code_mark = record.code_mark;
        script.final_mark = record.final_mark;
        script.comments = record.comments;
        script.meeting_comments = record.meeting_comments;
        script.checklist = record.checklist;
        script.marked_at = record.marked_at;
        Ok(script)
    }
}

impl From<Script> for ScriptRecord {
    fn from(script: Script) -> Self {
        Self {
            filename: script.filename,
            code_mark: script.code_mark,
            final_mark: script.final_mark,
            comments: script.comments,
            meeting_comments: script.meeting_comments,
            checklist: script.checklist,
            marked_at: script.marked_at,
        }
    }
}

/// Marks data for every student, unique by filename.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Script>", into = "Vec<Script>")]
pub struct ScriptSet {
    scripts: Vec<Script>,
}

impl ScriptSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a script, ignoring it when the filename is already present.
    pub fn add(&mut self, script: Script) -> bool {
        if self.contains(script.filename()) {
            return false;
        }
        self.scripts.push(script);
        true
    }

    pub fn sort(&mut self) {
        self.scripts.sort_by(|a, b| a.filename.cmp(&b.filename));
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.scripts.iter().any(|s| s.filename == filename)
    }

    pub fn get(&self, filename: &str) -> Option<&Script> {
        self.scripts.iter().find(|s| s.filename == filename)
    }

    pub fn get_mut(&mut self, filename: &str) -> Option<&mut Script> {
        self.scripts.iter_mut().find(|s| s.filename == filename)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Script> {
        self.scripts.iter()
    }

    pub fn len(&self) -> usize {
        self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scripts.is_empty()
    }

    /// Number of scripts with a recorded code mark.
    pub fn marked_count(&self) -> usize {
        self.scripts.iter().filter(|s| s.is_marked()).count()
    }
}

impl<'a> IntoIterator for &'a ScriptSet {
    type Item = &'a Script;
    type IntoIter = std::slice::Iter<'a, Script>;

    fn into_iter(self) -> Self::IntoIter {
        self.scripts.iter()
    }
}

impl TryFrom<Vec<Script>> for ScriptSet {
    type Error = ScriptError;

    fn try_from(scripts: Vec<Script>) -> Result<Self, Self::Error> {
        let mut set = ScriptSet::new();
        for script in scripts {
            let filename = script.filename.clone();
            if !set.add(script) {
                return Err(ScriptError::Duplicate(filename));
            }
        }
        Ok(set)
    }
}

impl From<ScriptSet> for Vec<Script> {
    fn from(set: ScriptSet) -> Self {
        set.scripts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_group_from_filename() {
        let script = Script::new("P03/s4412345.py").unwrap();
        assert_eq!(script.group(), "P03");
        assert!(!script.is_marked());
        assert!(!script.has_edits());
    }

    #[test]
    fn rejects_filenames_outside_the_convention() {
        for bad in ["P3/s1.py", "P03/x1.py", "P03/s1.txt", "s1.py", "P03/s.py"] {
            assert!(
                matches!(Script::new(bad), Err(ScriptError::InvalidFilename(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn final_mark_overrides_code_mark() {
        let mut script = Script::new("P01/s1.py").unwrap();
        script.code_mark = Some(7);
        assert_eq!(script.mark(), Some(7));
        script.final_mark = Some(9);
        assert_eq!(script.mark(), Some(9));
    }

    #[test]
    fn final_mark_alone_is_not_marked() {
        let mut script = Script::new("P01/s1.py").unwrap();
        script.final_mark = Some(4);
        assert!(!script.is_marked());
        assert!(script.has_edits());
    }

    #[test]
    fn update_stamps_only_real_changes() {
        let mut script = Script::new("P01/s1.py").unwrap();
        assert!(!script.update(MarkEdit::default()));
        assert!(script.marked_at.is_none());

        let edit = MarkEdit {
            code_mark: Some(6),
            comments: "Tidy.".into(),
            ..MarkEdit::default()
        };
        assert!(script.update(edit.clone()));
        let stamped = script.marked_at;
        assert!(stamped.is_some());

        assert!(!script.update(edit));
        assert_eq!(script.marked_at, stamped);
        assert_eq!(script.code_mark, Some(6));
    }

    #[test]
    fn reads_header_fields_after_token() {
        let source = "# Student Name:   Ada Lovelace  \n# Student Number: 4412345\n";
        assert_eq!(
            field_after_token(source, NAME_TOKEN).as_deref(),
            Some("Ada Lovelace")
        );
        assert_eq!(field_after_token(source, ID_TOKEN).as_deref(), Some("4412345"));
        assert_eq!(field_after_token(source, "Tutor:"), None);
    }

    #[test]
    fn set_ignores_duplicates_and_sorts() {
        let mut set = ScriptSet::new();
        assert!(set.add(Script::new("P02/s2.py").unwrap()));
        assert!(set.add(Script::new("P01/s9.py").unwrap()));
        assert!(!set.add(Script::new("P02/s2.py").unwrap()));
        set.sort();
        let names: Vec<&str> = set.iter().map(Script::filename).collect();
        assert_eq!(names, ["P01/s9.py", "P02/s2.py"]);
    }

    #[test]
    fn json_omits_group_and_restores_it() {
        let mut script = Script::new("P05/s77.py").unwrap();
        script.code_mark = Some(6);
        script.comments = "Tidy.".into();
        let json = serde_json::to_value(&script).unwrap();
        assert!(json.get("group").is_none());
        assert!(json.get("checklist").is_none());
        let back: Script = serde_json::from_value(json).unwrap();
        assert_eq!(back, script);
        assert_eq!(back.group(), "P05");
    }

    #[test]
    fn loads_legacy_records_without_optional_fields() {
        let raw = r#"[{"filename": "P01/s1.py", "code_mark": null, "final_mark": null,
                       "comments": "", "meeting_comments": ""}]"#;
        let set: ScriptSet = serde_json::from_str(raw).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.get("P01/s1.py").unwrap().checklist.is_none());
    }

    #[test]
    fn rejects_duplicate_filenames_in_json() {
        let raw = r#"[{"filename": "P01/s1.py"}, {"filename": "P01/s1.py"}]"#;
        let err = serde_json::from_str::<ScriptSet>(raw).unwrap_err();
        assert!(err.to_string().contains("duplicate script P01/s1.py"));
    }

    #[test]
    fn rejects_invalid_filenames_in_json() {
        let raw = r#"[{"filename": "notes.txt"}]"#;
        assert!(serde_json::from_str::<ScriptSet>(raw).is_err());
    }
}
