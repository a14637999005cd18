//! replace-run: run a script after patching it with regex substitutions
//!
//! The library holds the substitution core (statement parsing, template
//! expansion, ordered all-or-nothing transformation) and the runner that
//! executes the patched copy. The binary is at src/main.rs.

pub mod cli;
pub mod config;
pub mod diff_formatter;
pub mod error;
pub mod logger;
pub mod replacement;
pub mod runner;
pub mod script;
pub mod statement;
pub mod template;

// Re-export commonly used types for convenience
pub use error::ReplaceError;
pub use replacement::{Applied, Replacement};
pub use runner::{run_script, TemporaryScript};
pub use script::{compile_statements, read_script, transform_script};
pub use statement::parse_statement;
