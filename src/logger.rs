//! Debug logging support for replace-run
//!
//! When debug mode is enabled (config or --debug), operations are logged to
//! a file so the script's own stdout/stderr stay untouched.
//! Logs go to ~/.replace-run/replace-run.log unless the config names a file.

use crate::config::{config_dir, LoggingConfig};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, registry, EnvFilter};

/// Initialize the debug logging system
///
/// Returns the path to the log file, or None if logging is not enabled.
pub fn init_debug_logging(debug_enabled: bool, config: &LoggingConfig) -> Result<Option<PathBuf>> {
    if !debug_enabled {
        return Ok(None);
    }

    let log_path = match &config.log_file {
        Some(path) => path.clone(),
        None => default_log_path()?,
    };

    match open_log_file(&log_path) {
        Ok(log_file) => {
            let subscriber = registry()
                .with(
                    fmt::layer()
                        .with_writer(log_file)
                        .with_ansi(false)
                        .with_target(false)
                        .with_thread_ids(false)
                        .with_file(false)
                        .with_line_number(false)
                )
                .with(EnvFilter::new(filter_directive(&config.level)));

            tracing::subscriber::set_global_default(subscriber)
                .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

            Ok(Some(log_path))
        }
        Err(e) => {
            // Logging must never stop the script from running
            eprintln!("Warning: Could not create log file: {:#}", e);
            Ok(None)
        }
    }
}

fn open_log_file(log_path: &Path) -> Result<fs::File> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))
}

/// Default log file location
pub fn default_log_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("replace-run.log"))
}

fn filter_directive(level: &str) -> String {
    format!("replace_run={}", level.to_lowercase())
}
