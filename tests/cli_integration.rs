//! Integration tests for the replace-run command line
//!
//! Each test writes a small shell script into a temp directory and runs the
//! built binary against it.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const ECHO_SCRIPT: &str = "#!/bin/sh
echo 'replaced line'
echo 'replaced line'
echo 'replaced line'
echo 'replaced line'
";

const ECHO_SCRIPT_WITH_ARGUMENT: &str = "#!/bin/sh
true \"$1\"
";

fn write_script(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn run(arguments: &[&str], script: &Path, script_arguments: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_replace-run"))
        .args(arguments)
        .arg("--")
        .arg(script)
        .args(script_arguments)
        // Keep the user's config and log out of the tests
        .env("HOME", script.parent().unwrap())
        .env("NO_COLOR", "1")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn dir_entries(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_replace() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "echo_script.sh", ECHO_SCRIPT);

    let output = run(&["-r", "replaced line/test"], &script, &[]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "test\ntest\ntest\ntest\n");
}

#[test]
fn test_replace_with_group() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "echo_script.sh", ECHO_SCRIPT);

    // "echo 'replaced line'" keeps "echo " and loses the rest
    let output = run(&["-r", r"(\S+ ).+/\1out"], &script, &[]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "out\nout\nout\nout\n");
}

#[test]
fn test_no_replace() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "echo_script.sh", ECHO_SCRIPT);

    let output = run(
        &["-r", "no_replace/no_replace", "replaced line/test"],
        &script,
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty(), "script must not run");
    assert!(stderr(&output).contains("Statement \"no_replace/no_replace\" has not replaced the script."));
}

#[test]
fn test_script_argument() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "echo_script_with_argument.sh", ECHO_SCRIPT_WITH_ARGUMENT);

    let output = run(&["-r", "true/echo"], &script, &["output"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "output\n");
}

#[test]
fn test_exit_code_is_forwarded() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "exit.sh", "#!/bin/sh\nexit 0\n");

    let output = run(&["-r", "exit 0/exit 7"], &script, &[]);
    assert_eq!(output.status.code(), Some(7));
}

#[test]
fn test_temporary_script_is_removed() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "echo_script.sh", ECHO_SCRIPT);
    let before = dir_entries(&dir);

    let output = run(&["-r", "replaced line/test"], &script, &[]);
    assert!(output.status.success());
    assert_eq!(dir_entries(&dir), before);

    // The original script is untouched
    assert_eq!(fs::read_to_string(&script).unwrap(), ECHO_SCRIPT);
}

#[test]
fn test_temporary_script_shares_directory_and_extension() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "self.sh", "#!/bin/sh\necho \"$0\"\n");

    let output = run(&["-r", "echo/echo"], &script, &[]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let ran = PathBuf::from(stdout(&output).trim_end());
    assert_eq!(
        fs::canonicalize(ran.parent().unwrap()).unwrap(),
        fs::canonicalize(dir.path()).unwrap()
    );
    assert_eq!(ran.extension().unwrap(), "sh");
    assert_ne!(ran.file_name().unwrap(), "self.sh");
}

#[test]
fn test_output_mode() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "echo_script.sh", "#!/bin/sh\necho a\n");

    let output = run(&["-r", "echo a/echo b", "-o"], &script, &[]);

    assert_eq!(output.status.code(), Some(0));
    // Printed text is followed by one extra newline
    assert_eq!(stdout(&output), "#!/bin/sh\necho b\n\n");
}

#[test]
fn test_diff_mode() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "echo_script.sh", ECHO_SCRIPT);

    let output = run(&["-r", "replaced line/test", "--diff"], &script, &[]);

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("-echo 'replaced line'\n"));
    assert!(out.contains("+echo 'test'\n"));
    assert!(out.contains("Total: 4 removed, 4 added"));
}

#[test]
fn test_malformed_statement() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "echo_script.sh", ECHO_SCRIPT);

    let output = run(&["-r", "a"], &script, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("The delimiter \"/\" is not found."));

    let output = run(&["-r", "/a"], &script, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("The pattern is not found."));
}

#[test]
fn test_invalid_pattern() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "echo_script.sh", ECHO_SCRIPT);

    let output = run(&["-r", "[/a"], &script, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("The pattern is wrong"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_invalid_replacement() {
    let dir = TempDir::new().unwrap();
    let script = write_script(&dir, "echo_script.sh", ECHO_SCRIPT);

    let output = run(&["-r", "replaced/\\"], &script, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_missing_script() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("missing.sh");

    let output = run(&["-r", "a/b"], &script, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("missing.sh"));
}

#[test]
fn test_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_replace-run"))
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("--replace"));
}
