//! Checklist schema and the `[x]` / `[ ]` / `[-]` mini-format shown to graders.
//!
//! A schema is an ordered list of headers, each owning an ordered list of entry
//! names. It is loaded from a JSON file next to the marks file. Recorded
//! checklists store one [`CheckState`] per schema entry.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{self, Write};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

use anyhow::{Context, Result};

/// Template lines a rendered `Header:` line must never look like.
const TEMPLATE_LABELS: [&str; 4] = [
    "Code mark:",
    "Final mark:",
    "General comments:",
    "Meeting comments:",
];

static HEADER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S.*):$").expect("valid header pattern"));
static ENTRY_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(.)\][ \t]+(.+?)[ \t]*$").expect("valid entry pattern"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChecklistError {
    #[error("checklist schema has an empty header")]
    EmptyHeader,
    #[error("checklist header '{0}' cannot be shown in the editor")]
    InvalidHeader(String),
    #[error("checklist header '{0}' appears more than once")]
    DuplicateHeader(String),
    #[error("checklist entry '{entry}' under '{header}' cannot be shown in the editor")]
    InvalidEntry { header: String, entry: String },
    #[error("checklist entry '{entry}' appears more than once under '{header}'")]
    DuplicateEntry { header: String, entry: String },
    #[error("Malformed checklist line: {0:?}")]
    MalformedLine(String),
    #[error("Unknown checklist header: {0:?}")]
    UnknownHeader(String),
    #[error("Unknown checklist entry {entry:?} under header {header:?}")]
    UnknownEntry { header: String, entry: String },
    #[error("Checklist entry {0:?} appears before any header")]
    EntryBeforeHeader(String),
    #[error("Checklist entry {entry:?} under header {header:?} is listed twice")]
    RepeatedEntry { header: String, entry: String },
}

/// Tri-state value of a single checklist entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    Checked,
    #[default]
    Unchecked,
    NotApplicable,
}

impl CheckState {
    /// Character shown between the brackets.
    pub fn marker(self) -> char {
        match self {
            CheckState::Checked => 'x',
            CheckState::Unchecked => ' ',
            CheckState::NotApplicable => '-',
        }
    }

    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            'x' => Some(CheckState::Checked),
            ' ' => Some(CheckState::Unchecked),
            '-' => Some(CheckState::NotApplicable),
            _ => None,
        }
    }
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.marker())
    }
}

/// One header of the checklist schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSection {
    pub header: String,
    pub entries: Vec<String>,
}

/// Headers and entries every script's checklist is validated against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SchemaSection>", into = "Vec<SchemaSection>")]
pub struct ChecklistSchema {
    sections: Vec<SchemaSection>,
}

impl ChecklistSchema {
    pub fn new(sections: Vec<SchemaSection>) -> Result<Self, ChecklistError> {
        let mut headers = HashSet::new();
        for section in &sections {
            let header = section.header.as_str();
            if header.is_empty() {
                return Err(ChecklistError::EmptyHeader);
            }
            if !is_single_trimmed_line(header)
                || header.starts_with('[')
                || header.starts_with('#')
                || header.starts_with('-')
                || header.ends_with(':')
                || is_template_label(header)
            {
                return Err(ChecklistError::InvalidHeader(header.to_string()));
            }
            if !headers.insert(header) {
                return Err(ChecklistError::DuplicateHeader(header.to_string()));
            }
            let mut entries = HashSet::new();
            for entry in &section.entries {
                if entry.is_empty() || !is_single_trimmed_line(entry) || entry.starts_with('#') {
                    return Err(ChecklistError::InvalidEntry {
                        header: header.to_string(),
                        entry: entry.clone(),
                    });
                }
                if !entries.insert(entry.as_str()) {
                    return Err(ChecklistError::DuplicateEntry {
                        header: header.to_string(),
                        entry: entry.clone(),
                    });
                }
            }
        }
        Ok(Self { sections })
    }

    /// Load a schema file; `Ok(None)` when the file does not exist.
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read checklist file {}", path.display()))?;
        let schema: Self = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse checklist file {}", path.display()))?;
        tracing::debug!(
            path = %path.display(),
            sections = schema.sections.len(),
            "loaded checklist schema"
        );
        Ok(Some(schema))
    }

    pub fn sections(&self) -> &[SchemaSection] {
        &self.sections
    }

    fn section(&self, header: &str) -> Option<&SchemaSection> {
        self.sections.iter().find(|s| s.header == header)
    }

    /// Render the editable checklist block, taking states from `recorded` where present.
    pub fn render(&self, recorded: Option<&Checklist>) -> String {
        let mut out = String::new();
        for (idx, section) in self.sections.iter().enumerate() {
            if idx > 0 {
                out.push('\n');
            }
            writeln!(&mut out, "{}:", section.header).ok();
            for entry in &section.entries {
                let state = recorded
                    .and_then(|c| c.state_of(&section.header, entry))
                    .unwrap_or_default();
                writeln!(&mut out, "{} {}", state, entry).ok();
            }
        }
        out.truncate(out.trim_end().len());
        out
    }

    /// Parse an edited checklist block back into states for every schema entry.
    pub fn parse(&self, text: &str) -> Result<Checklist, ChecklistError> {
        let mut checklist = Checklist::blank(self);
        let mut current: Option<&SchemaSection> = None;
        let mut seen: HashSet<(&str, String)> = HashSet::new();

        for raw in text.lines() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('[') {
                let caps = ENTRY_LINE
                    .captures(line)
                    .ok_or_else(|| ChecklistError::MalformedLine(line.to_string()))?;
                let marker = caps[1].chars().next().unwrap_or_default();
                let state = CheckState::from_marker(marker)
                    .ok_or_else(|| ChecklistError::MalformedLine(line.to_string()))?;
                let entry = caps[2].to_string();
                let section =
                    current.ok_or_else(|| ChecklistError::EntryBeforeHeader(entry.clone()))?;
                if !section.entries.contains(&entry) {
                    return Err(ChecklistError::UnknownEntry {
                        header: section.header.clone(),
                        entry,
                    });
                }
                if !seen.insert((section.header.as_str(), entry.clone())) {
                    return Err(ChecklistError::RepeatedEntry {
                        header: section.header.clone(),
                        entry,
                    });
                }
                checklist.set(&section.header, &entry, state);
            } else if let Some(caps) = HEADER_LINE.captures(line) {
                let header = &caps[1];
                current = Some(
                    self.section(header)
                        .ok_or_else(|| ChecklistError::UnknownHeader(header.to_string()))?,
                );
            } else {
                return Err(ChecklistError::MalformedLine(line.to_string()));
            }
        }
        Ok(checklist)
    }
}

impl TryFrom<Vec<SchemaSection>> for ChecklistSchema {
    type Error = ChecklistError;

    fn try_from(sections: Vec<SchemaSection>) -> Result<Self, Self::Error> {
        ChecklistSchema::new(sections)
    }
}

impl From<ChecklistSchema> for Vec<SchemaSection> {
    fn from(schema: ChecklistSchema) -> Self {
        schema.sections
    }
}

fn is_template_label(header: &str) -> bool {
    let line = format!("{header}:");
    TEMPLATE_LABELS.iter().any(|label| line.starts_with(label))
}

fn is_single_trimmed_line(s: &str) -> bool {
    !s.contains('\n') && !s.contains('\r') && s.trim() == s
}

/// A recorded checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistEntry {
    pub name: String,
    pub state: CheckState,
}

/// Recorded states under one header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistSection {
    pub header: String,
    pub entries: Vec<ChecklistEntry>,
}

/// Checklist states recorded against a script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checklist {
    pub sections: Vec<ChecklistSection>,
}

impl Checklist {
    /// Every schema entry, unchecked.
    pub fn blank(schema: &ChecklistSchema) -> Self {
        let sections = schema
            .sections
            .iter()
            .map(|section| ChecklistSection {
                header: section.header.clone(),
                entries: section
                    .entries
                    .iter()
                    .map(|name| ChecklistEntry {
                        name: name.clone(),
                        state: CheckState::Unchecked,
                    })
                    .collect(),
            })
            .collect();
        Self { sections }
    }

    pub fn state_of(&self, header: &str, entry: &str) -> Option<CheckState> {
        self.sections
            .iter()
            .find(|s| s.header == header)?
            .entries
            .iter()
            .find(|e| e.name == entry)
            .map(|e| e.state)
    }

    fn set(&mut self, header: &str, entry: &str, state: CheckState) {
        if let Some(slot) = self
            .sections
            .iter_mut()
            .filter(|s| s.header == header)
            .flat_map(|s| s.entries.iter_mut())
            .find(|e| e.name == entry)
        {
            slot.state = state;
        }
    }

    /// Count of entries in each state: (checked, unchecked, not applicable).
    pub fn tally(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for entry in self.sections.iter().flat_map(|s| &s.entries) {
            match entry.state {
                CheckState::Checked => counts.0 += 1,
                CheckState::Unchecked => counts.1 += 1,
                CheckState::NotApplicable => counts.2 += 1,
            }
        }
        counts
    }
}
