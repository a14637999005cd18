//! Ordered, all-or-nothing transformation of a script's text

use crate::error::ReplaceError;
use crate::replacement::{Applied, Replacement};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Compile every statement, in order
///
/// Fails on the first statement that doesn't parse or compile; no partial
/// list is ever returned.
pub fn compile_statements<S: AsRef<str>>(statements: &[S]) -> Result<Vec<Replacement>, ReplaceError> {
    statements
        .iter()
        .map(|statement| Replacement::from_statement(statement.as_ref()))
        .collect()
}

/// Read the script to transform
pub fn read_script(path: &Path) -> Result<String, ReplaceError> {
    fs::read_to_string(path).map_err(|source| ReplaceError::SourceUnreadable {
        path: path.to_path_buf(),
        source,
    })
}

/// Apply `replacements` one after another to `source`
///
/// Each replacement sees the output of the previous one. The first
/// replacement that matches nothing aborts the whole transformation with
/// [`ReplaceError::NoMatch`] carrying its index.
pub fn transform_script(source: &str, replacements: &[Replacement]) -> Result<String, ReplaceError> {
    let mut text = source.to_string();

    for (index, replacement) in replacements.iter().enumerate() {
        match replacement.apply(&text)? {
            Applied::Replaced { text: replaced, count } => {
                debug!(index, pattern = replacement.pattern(), count, "statement applied");
                text = replaced;
            }
            Applied::NoMatch => {
                debug!(index, pattern = replacement.pattern(), "statement matched nothing");
                return Err(ReplaceError::NoMatch { index });
            }
        }
    }

    Ok(text)
}
