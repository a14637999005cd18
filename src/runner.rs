//! Running the replaced script
//!
//! The replaced text is written to a temporary file next to the original
//! script, with the same extension, so shebang lines and relative paths keep
//! working. The file is owner-only rwx and removed once the child exits.

use anyhow::{Context, Result};
use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tempfile::{Builder, TempPath};
use tracing::{debug, warn};

const TEMP_PREFIX: &str = "replace-run-";

/// A replaced script on disk, deleted when dropped
#[derive(Debug)]
pub struct TemporaryScript {
    path: TempPath,
}

impl TemporaryScript {
    /// Write `text` to a new executable file beside `original`
    ///
    /// The content is synced to disk and the write handle closed before the
    /// file is returned, so it can be executed right away.
    pub fn create(text: &str, original: &Path) -> Result<Self> {
        let directory = script_directory(original)?;
        let suffix = original
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();

        let mut file = Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(&suffix)
            .tempfile_in(&directory)
            .with_context(|| format!("Failed to create temp file in {}", directory.display()))?;

        file.write_all(text.as_bytes())
            .with_context(|| format!("Failed to write temp file: {}", file.path().display()))?;
        file.as_file()
            .sync_all()
            .with_context(|| format!("Failed to sync temp file: {}", file.path().display()))?;

        set_owner_only_executable(file.path())?;

        // Closing the handle here avoids "text file busy" on exec
        let path = file.into_temp_path();
        debug!(path = %path.display(), "temporary script created");

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the file now, reporting failures instead of ignoring them
    pub fn close(self) -> io::Result<()> {
        self.path.close()
    }
}

/// Run `text` as a script placed beside `original`, returning its exit code
pub fn run_script(text: &str, original: &Path, args: &[OsString]) -> Result<i32> {
    let script = TemporaryScript::create(text, original)?;

    debug!(script = %script.path().display(), ?args, "running script");
    let status = Command::new(script.path())
        .args(args)
        .status()
        .with_context(|| format!("Failed to run {}", original.display()))?;

    let code = exit_code(status);
    debug!(code, "script finished");

    if let Err(e) = script.close() {
        warn!(error = %e, "failed to remove temporary script");
    }

    Ok(code)
}

/// Exit code of a finished child, using the shell's 128+N for signals
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

fn script_directory(original: &Path) -> Result<PathBuf> {
    let absolute = std::path::absolute(original)
        .with_context(|| format!("Failed to resolve path: {}", original.display()))?;

    Ok(absolute
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/")))
}

#[cfg(unix)]
fn set_owner_only_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o700))
        .with_context(|| format!("Failed to set permissions on {}", path.display()))
}

#[cfg(not(unix))]
fn set_owner_only_executable(_path: &Path) -> Result<()> {
    Ok(())
}
