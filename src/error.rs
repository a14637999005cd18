//! Error taxonomy for statement compilation and script transformation

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplaceError {
    /// The statement could not be split, or its pattern is empty
    #[error("{reason}")]
    MalformedStatement { reason: String },

    /// The pattern failed to compile as a regular expression
    #[error("The pattern is wrong: {message}")]
    InvalidPattern { message: String },

    /// The replacement template doesn't fit the pattern it is paired with
    #[error("{message}")]
    InvalidReplacementTemplate { message: String },

    /// The statement at `index` matched nothing in the working text
    #[error("statement #{index} has not replaced the script")]
    NoMatch { index: usize },

    #[error("Failed to read script: {}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ReplaceError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        ReplaceError::MalformedStatement {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_template(message: impl Into<String>) -> Self {
        ReplaceError::InvalidReplacementTemplate {
            message: message.into(),
        }
    }

    /// True for errors raised while compiling statements, before any text is touched
    pub fn is_statement_level(&self) -> bool {
        matches!(
            self,
            ReplaceError::MalformedStatement { .. } | ReplaceError::InvalidPattern { .. }
        )
    }
}
