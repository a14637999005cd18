//! Compiled statements and their application to text

use crate::error::ReplaceError;
use crate::statement::parse_statement;
use crate::template::Template;
use regex::Regex;

/// Outcome of applying one replacement to a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// At least one match was substituted
    Replaced { text: String, count: usize },
    /// The pattern matched nowhere in the text
    NoMatch,
}

/// A compiled pattern paired with its raw replacement template
#[derive(Debug, Clone)]
pub struct Replacement {
    regex: Regex,
    template: String,
}

impl Replacement {
    /// Compile `pattern` and pair it with `template`
    ///
    /// The template is only checked against the pattern's groups when the
    /// replacement is applied.
    pub fn new(pattern: &str, template: &str) -> Result<Self, ReplaceError> {
        let regex = Regex::new(pattern).map_err(|e| ReplaceError::InvalidPattern {
            message: describe_regex_error(&e),
        })?;

        Ok(Self {
            regex,
            template: template.to_string(),
        })
    }

    /// Parse and compile a `<pattern>/<replacement>` statement
    pub fn from_statement(statement: &str) -> Result<Self, ReplaceError> {
        let (pattern, template) = parse_statement(statement)?;
        Self::new(&pattern, &template)
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Substitute every non-overlapping match in `text`
    ///
    /// Returns [`Applied::NoMatch`] when nothing matched. A template that
    /// doesn't fit the pattern is an error even if nothing would match.
    pub fn apply(&self, text: &str) -> Result<Applied, ReplaceError> {
        let template = Template::compile(&self.template, &self.regex)?;

        let mut result = String::with_capacity(text.len());
        let mut last_end = 0;
        let mut search_from = 0;
        let mut count = 0;

        // An empty match may directly follow a non-empty one, so the search
        // is driven by hand instead of through captures_iter
        while search_from <= text.len() {
            let Some(caps) = self.regex.captures_at(text, search_from) else {
                break;
            };
            // Group 0 always participates
            let Some(whole) = caps.get(0) else { break };

            result.push_str(&text[last_end..whole.start()]);
            match template.as_literal() {
                Some(literal) => result.push_str(literal),
                None => template.expand(&caps, &mut result),
            }
            last_end = whole.end();
            count += 1;

            search_from = if whole.is_empty() {
                match text[whole.end()..].chars().next() {
                    Some(c) => whole.end() + c.len_utf8(),
                    None => break,
                }
            } else {
                whole.end()
            };
        }

        if count == 0 {
            return Ok(Applied::NoMatch);
        }

        result.push_str(&text[last_end..]);
        Ok(Applied::Replaced {
            text: result,
            count,
        })
    }
}

/// Keep the last line of the regex crate's diagnostic, which carries the reason
fn describe_regex_error(err: &regex::Error) -> String {
    match err {
        regex::Error::Syntax(msg) => msg
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .map(|line| line.trim_start_matches("error: ").trim().to_string())
            .unwrap_or_else(|| msg.clone()),
        other => other.to_string(),
    }
}
