//! The editable text shown to the grader, and the parser that reads it back.

use crate::checklist::{Checklist, ChecklistError, ChecklistSchema};
use crate::script::Script;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Separator line closing the general comments and the checklist block.
pub const SEPARATOR: &str = "----------------------------------------";

const EXISTING_NOTICE: &str = "\n\n# Note that the following mark/comment already exists for this student.\n# Edits to this will overwrite the existing mark/comment.";

static CODE_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Code mark:[ \t]*(\d*)[ \t]*$").expect("valid pattern"));
static FINAL_MARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^Final mark:[ \t]*(\d*)[ \t]*$").expect("valid pattern"));
static GENERAL_COMMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?ms)^General comments:\s*(.*?)\s*^-{40}").expect("valid pattern")
});
static CHECKLIST_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)^-{40}[^\n]*\n(.*?)^-{40}").expect("valid pattern"));
static SEPARATOR_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^-{40}").expect("valid pattern"));
static MEETING_COMMENTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)^Meeting comments:\s*(.*)").expect("valid pattern"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error(
        "No valid 'Code mark' line was found.\nNext time, enter a single integer on the same line as 'Code mark:'."
    )]
    CodeMark,
    #[error(
        "No valid 'Final mark' line was found.\nNext time, enter a single integer on the same line as 'Final mark:'."
    )]
    FinalMark,
    #[error("No 'General comments:'.\nHow did you break that?")]
    GeneralComments,
    #[error("No checklist section.\nKeep the checklist between the two dashed lines.")]
    ChecklistSection,
    #[error(transparent)]
    Checklist(#[from] ChecklistError),
    #[error(
        "Found {found} dashed separator lines, expected {expected}.\nComments cannot contain a line starting with 40 dashes."
    )]
    Separators { found: usize, expected: usize },
    #[error("No 'Meeting comments:' line.\nHow did you break that?")]
    MeetingComments,
    #[error("Comments cannot contain \"\"\".")]
    TripleQuote,
}

/// Fields recovered from an edited template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkEdit {
    pub code_mark: Option<u32>,
    pub final_mark: Option<u32>,
    pub comments: String,
    pub meeting_comments: String,
    pub checklist: Option<Checklist>,
}

/// Build the text the grader edits for `script`.
pub fn render_template(script: &Script, schema: Option<&ChecklistSchema>) -> String {
    let notice = if script.has_edits() { EXISTING_NOTICE } else { "" };
    let checklist = match schema {
        Some(schema) => format!(
            "{SEPARATOR}\n\
             # Checklist: [x] done, [ ] not done, [-] not applicable.\n\
             # Headers and entries must not be renamed.\n\
             \n\
             {}\n\
             \n",
            schema.render(script.checklist.as_ref())
        ),
        None => String::new(),
    };
    format!(
        "# Enter mark and comments for {filename}.\n\
         # Lines beginning with # are discarded.\n\
         # If the 'mark' lines are left blank, no mark will be assigned.{notice}\n\
         \n\
         Code mark:{code_mark}\n\
         \n\
         General comments:\n\
         \n\
         {comments}\n\
         \n\
         {checklist}{SEPARATOR}\n\
         \n\
         # This is the mark which will be entered into the student's file.\n\
         Final mark:{final_mark}\n\
         \n\
         Meeting comments:\n\
         \n\
         {meeting_comments}\n",
        filename = script.filename(),
        code_mark = render_mark(script.code_mark),
        comments = script.comments,
        final_mark = render_mark(script.final_mark),
        meeting_comments = script.meeting_comments,
    )
}

/// Leading space included so a blank mark leaves no trailing whitespace.
fn render_mark(mark: Option<u32>) -> String {
    mark.map(|m| format!(" {m}")).unwrap_or_default()
}

/// Parse an edited template. A checklist block is required iff `schema` is given.
pub fn parse_template(
    text: &str,
    schema: Option<&ChecklistSchema>,
) -> Result<MarkEdit, TemplateError> {
    let text = strip_comment_lines(text);

    let code_mark = capture_mark(&CODE_MARK, &text).ok_or(TemplateError::CodeMark)?;
    let final_mark = capture_mark(&FINAL_MARK, &text).ok_or(TemplateError::FinalMark)?;

    let comments = GENERAL_COMMENTS
        .captures(&text)
        .ok_or(TemplateError::GeneralComments)?[1]
        .trim()
        .to_string();

    let found = SEPARATOR_LINE.find_iter(&text).count();
    let expected = if schema.is_some() { 2 } else { 1 };
    if found > expected {
        return Err(TemplateError::Separators { found, expected });
    }

    let checklist = match schema {
        Some(schema) => {
            let block = CHECKLIST_BLOCK
                .captures(&text)
                .ok_or(TemplateError::ChecklistSection)?;
            Some(schema.parse(&block[1])?)
        }
        None => None,
    };

    let meeting_comments = MEETING_COMMENTS
        .captures(&text)
        .ok_or(TemplateError::MeetingComments)?[1]
        .trim()
        .to_string();

    if comments.contains(r#"""""#) || meeting_comments.contains(r#"""""#) {
        return Err(TemplateError::TripleQuote);
    }

    Ok(MarkEdit {
        code_mark,
        final_mark,
        comments,
        meeting_comments,
        checklist,
    })
}

fn strip_comment_lines(text: &str) -> String {
    text.replace("\r\n", "\n")
        .split('\n')
        .filter(|line| !line.starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n")
}

/// `None` when the line is missing or the digits overflow; `Some(None)` for a blank mark.
fn capture_mark(pattern: &Regex, text: &str) -> Option<Option<u32>> {
    let caps = pattern.captures(text)?;
    let digits = &caps[1];
    if digits.is_empty() {
        return Some(None);
    }
    digits.parse().ok().map(Some)
}
