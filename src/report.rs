//! Progress reporting and script selection over a [`ScriptSet`].

use crate::script::{Script, ScriptSet};
use rand::Rng;
use rand::seq::SliceRandom;

const COMMENT_PREVIEW: usize = 26;

pub const STATUS_HEADER: &str = "Student:        Mark    General comments";

/// Whether a status row describes a marked script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Marked,
    Unmarked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub kind: RowKind,
    pub text: String,
}

/// Rows of the status table plus the marked/total counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub rows: Vec<StatusRow>,
    pub done: usize,
    pub total: usize,
}

impl StatusReport {
    pub fn build(scripts: &ScriptSet) -> Self {
        let rows = scripts
            .iter()
            .map(|script| {
                let comments = comment_preview(&script.comments);
                match script.mark().filter(|_| script.is_marked()) {
                    Some(mark) => StatusRow {
                        kind: RowKind::Marked,
                        text: format!("{:<15} {:>4}    {}", script.filename(), mark, comments)
                            .trim_end()
                            .to_string(),
                    },
                    None => StatusRow {
                        kind: RowKind::Unmarked,
                        text: format!("{:<24}{}", script.filename(), comments)
                            .trim_end()
                            .to_string(),
                    },
                }
            })
            .collect();
        Self {
            rows,
            done: scripts.marked_count(),
            total: scripts.len(),
        }
    }

    pub fn summary(&self) -> String {
        format!("Total: {}/{}", self.done, self.total)
    }
}

/// First characters of the comments on one line, with `...` when cut short.
fn comment_preview(comments: &str) -> String {
    let mut preview: String = comments
        .chars()
        .take(COMMENT_PREVIEW)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    if comments.chars().count() > COMMENT_PREVIEW {
        preview.push_str("...");
    }
    preview
}

/// Pick an unmarked script uniformly at random, optionally limited to `groups`.
pub fn pick_unmarked<'a, R: Rng + ?Sized>(
    scripts: &'a ScriptSet,
    groups: &[String],
    rng: &mut R,
) -> Option<&'a Script> {
    let options: Vec<&Script> = scripts
        .iter()
        .filter(|s| !s.is_marked())
        .filter(|s| groups.is_empty() || groups.iter().any(|g| g == s.group()))
        .collect();
    options.choose(rng).copied()
}

/// Scripts of one group in filename order, or shuffled when `rng` is given.
pub fn group_scripts<'a, R: Rng + ?Sized>(
    scripts: &'a ScriptSet,
    group: &str,
    rng: Option<&mut R>,
) -> Vec<&'a Script> {
    let mut selected: Vec<&Script> = scripts.iter().filter(|s| s.group() == group).collect();
    selected.sort_by(|a, b| a.filename().cmp(b.filename()));
    if let Some(rng) = rng {
        selected.shuffle(rng);
    }
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn set() -> ScriptSet {
        let mut set = ScriptSet::new();
        let mut a = Script::new("P01/s1.py").unwrap();
        a.code_mark = Some(7);
        a.final_mark = Some(10);
        a.comments = "Great job.\nVery readable and well commented throughout.".into();
        set.add(a);
        let mut b = Script::new("P01/s2.py").unwrap();
        b.comments = "Half done".into();
        set.add(b);
        set.add(Script::new("P02/s3.py").unwrap());
        let mut d = Script::new("P02/s4.py").unwrap();
        d.code_mark = Some(5);
        set.add(d);
        set
    }

    #[test]
    fn status_rows_match_table_layout() {
        let report = StatusReport::build(&set());
        let texts: Vec<(&RowKind, &str)> =
            report.rows.iter().map(|r| (&r.kind, r.text.as_str())).collect();
        assert_eq!(
            texts,
            [
                (
                    &RowKind::Marked,
                    "P01/s1.py         10    Great job. Very readable a..."
                ),
                (&RowKind::Unmarked, "P01/s2.py               Half done"),
                (&RowKind::Unmarked, "P02/s3.py"),
                (&RowKind::Marked, "P02/s4.py          5"),
            ]
        );
        assert_eq!(report.summary(), "Total: 2/4");
    }

    #[test]
    fn final_mark_alone_reports_unmarked() {
        let mut set = ScriptSet::new();
        let mut s = Script::new("P01/s1.py").unwrap();
        s.final_mark = Some(3);
        set.add(s);
        let report = StatusReport::build(&set);
        assert_eq!(report.rows[0].kind, RowKind::Unmarked);
        assert_eq!(report.done, 0);
    }

    #[test]
    fn random_pick_only_returns_unmarked() {
        let set = set();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let picked = pick_unmarked(&set, &[], &mut rng).unwrap();
            assert!(!picked.is_marked());
        }
        let only_p02 = pick_unmarked(&set, &["P02".to_string()], &mut rng).unwrap();
        assert_eq!(only_p02.filename(), "P02/s3.py");
        assert!(pick_unmarked(&set, &["P09".to_string()], &mut rng).is_none());
    }

    #[test]
    fn random_pick_when_all_marked() {
        let mut set = ScriptSet::new();
        let mut s = Script::new("P01/s1.py").unwrap();
        s.code_mark = Some(1);
        set.add(s);
        assert!(pick_unmarked(&set, &[], &mut StdRng::seed_from_u64(1)).is_none());
    }

    #[test]
    fn group_listing_sorted_or_shuffled() {
        let set = set();
        let ordered = group_scripts::<StdRng>(&set, "P01", None);
        let names: Vec<&str> = ordered.iter().map(|s| s.filename()).collect();
        assert_eq!(names, ["P01/s1.py", "P01/s2.py"]);

        let mut rng = StdRng::seed_from_u64(3);
        let mut shuffled: Vec<&str> = group_scripts(&set, "P02", Some(&mut rng))
            .iter()
            .map(|s| s.filename())
            .collect();
        shuffled.sort();
        assert_eq!(shuffled, ["P02/s3.py", "P02/s4.py"]);
    }

    #[test]
    fn preview_cuts_long_comments() {
        assert_eq!(comment_preview("short"), "short");
        assert_eq!(
            comment_preview("abcdefghijklmnopqrstuvwxyz"),
            "abcdefghijklmnopqrstuvwxyz"
        );
        assert_eq!(
            comment_preview("abcdefghijklmnopqrstuvwxyz!"),
            "abcdefghijklmnopqrstuvwxyz..."
        );
    }
}
