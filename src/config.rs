//! Configuration management for replace-run
//!
//! replace-run reads optional settings from ~/.replace-run/config.toml.
//! A missing file means defaults; the file is never created implicitly.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
const COLOR_MODES: &[&str] = &["auto", "always", "never"];

/// replace-run configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Output settings for --output and --diff
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write a debug log for every run
    #[serde(default)]
    pub debug: bool,

    /// Log level used when debug logging is on
    #[serde(default = "default_level")]
    pub level: String,

    /// Log file (default: ~/.replace-run/replace-run.log)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: default_level(),
            log_file: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Diff colouring: "auto", "always" or "never"
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            color: default_color(),
        }
    }
}

fn default_level() -> String { "debug".to_string() }
fn default_color() -> String { "auto".to_string() }

/// Directory holding the config file and the default log file
pub fn config_dir() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home_dir.join(".replace-run"))
}

/// Get the configuration file path
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

/// Load the default configuration file, if there is one
pub fn load_config() -> Result<Config> {
    match config_file_path() {
        Ok(path) if path.exists() => load_config_from(&path),
        _ => Ok(Config::default()),
    }
}

/// Load and validate configuration from `path`
pub fn load_config_from(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    validate_config(&config)
        .with_context(|| format!("Invalid config file: {}", path.display()))?;

    Ok(config)
}

/// Validate configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        anyhow::bail!(
            "Invalid level: {} (must be one of {})",
            config.logging.level,
            LOG_LEVELS.join(", ")
        );
    }

    if !COLOR_MODES.contains(&config.output.color.as_str()) {
        anyhow::bail!(
            "Invalid color: {} (must be 'auto', 'always', or 'never')",
            config.output.color
        );
    }

    Ok(())
}
