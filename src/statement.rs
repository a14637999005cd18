//! Statement parsing
//!
//! A statement has the form `<pattern>/<replacement>`. Inside the pattern a
//! literal `/` is written as `\/`. The replacement is kept verbatim; its
//! escapes are resolved later by the template expander.

use crate::error::ReplaceError;

const DELIMITER: char = '/';
const ESCAPED_DELIMITER: &str = "\\/";

/// Split a statement into its pattern and raw replacement template
///
/// The delimiter search starts right after the last `\/` in the statement,
/// so escaped delimiters in the pattern never split it.
///
/// # Examples
///
/// ```
/// use replace_run::statement::parse_statement;
///
/// let (pattern, replacement) = parse_statement(r"a\/b/c").unwrap();
/// assert_eq!(pattern, "a/b");
/// assert_eq!(replacement, "c");
/// ```
pub fn parse_statement(statement: &str) -> Result<(String, String), ReplaceError> {
    let start = statement
        .rfind(ESCAPED_DELIMITER)
        .map(|i| i + ESCAPED_DELIMITER.len())
        .unwrap_or(0);

    let index = statement[start..]
        .find(DELIMITER)
        .map(|i| start + i)
        .ok_or_else(|| ReplaceError::malformed("The delimiter \"/\" is not found."))?;

    let pattern = statement[..index].replace(ESCAPED_DELIMITER, "/");
    let replacement = statement[index + DELIMITER.len_utf8()..].to_string();

    if pattern.is_empty() {
        return Err(ReplaceError::malformed("The pattern is not found."));
    }

    Ok((pattern, replacement))
}
