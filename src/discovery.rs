use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};

static GROUP_DIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^P\d{2}$").expect("valid group pattern"));
static SCRIPT_FILE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^s\d+\.py$").expect("valid script pattern"));

/// Find every `PNN/sNNN.py` script under `root`, sorted by key.
pub fn discover_scripts(root: &Path) -> Result<Vec<String>> {
    let mut found = Vec::new();
    for group in read_names(root)? {
        let group_path = root.join(&group);
        if !GROUP_DIR.is_match(&group) || !group_path.is_dir() {
            continue;
        }
        for file in read_names(&group_path)? {
            if SCRIPT_FILE.is_match(&file) && group_path.join(&file).is_file() {
                found.push(format!("{group}/{file}"));
            }
        }
    }
    found.sort();
    tracing::debug!(root = %root.display(), count = found.len(), "scanned for scripts");
    Ok(found)
}

/// UTF-8 entry names of a directory; other names cannot match the conventions.
fn read_names(dir: &Path) -> Result<Vec<String>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to list {}", dir.display()))?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    Ok(names)
}
