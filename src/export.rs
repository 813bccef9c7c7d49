use crate::script::Script;
use thiserror::Error;

/// Replaced by the reported mark.
pub const MARK_PLACEHOLDER: &str = "{{MARK}}";
/// Replaced by the general comments.
pub const COMMENTS_PLACEHOLDER: &str = "{{COMMENTS}}";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExportError {
    #[error("{0} has not been marked yet")]
    NotMarked(String),
    #[error("{filename} must contain {placeholder} exactly once (found {count})")]
    Placeholder {
        filename: String,
        placeholder: &'static str,
        count: usize,
    },
    #[error("comments for {0} cannot contain \"\"\"")]
    TripleQuote(String),
}

/// Substitute the recorded mark and comments into the student's source text.
pub fn export_script(script: &Script, source: &str) -> Result<String, ExportError> {
    let mark = script
        .mark()
        .ok_or_else(|| ExportError::NotMarked(script.filename().to_string()))?;
    if script.comments.contains(r#"""""#) {
        return Err(ExportError::TripleQuote(script.filename().to_string()));
    }
    for placeholder in [MARK_PLACEHOLDER, COMMENTS_PLACEHOLDER] {
        let count = source.matches(placeholder).count();
        if count != 1 {
            return Err(ExportError::Placeholder {
                filename: script.filename().to_string(),
                placeholder,
                count,
            });
        }
    }
    Ok(source
        .replacen(MARK_PLACEHOLDER, &mark.to_string(), 1)
        .replacen(COMMENTS_PLACEHOLDER, &script.comments, 1))
}
