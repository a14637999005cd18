use anyhow::Result;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "

License: MIT
Rust Edition: 2024"
);

/// Options that consume the following argument as their value
const VALUE_OPTIONS: &[&str] = &["--config"];

#[derive(Parser, Debug)]
#[command(name = "replace-run")]
#[command(about = "Run a script that is replaced by specified regular expressions")]
#[command(long_about = "replace-run patches the text of a script with an ordered list of
regular-expression substitutions and runs the patched copy.

The original script is never modified. The patched text is written to a
temporary executable file next to the original (same directory, same
extension), run with the remaining arguments, and deleted afterwards.

Every statement must replace something. If any statement matches nothing,
the script is not run at all.

STATEMENTS:
  <regular expression>/<replacement>
  Write a literal '/' in the regular expression as '\\/'.
  '$' matches only at the very end of the script, not before a final
  newline. Use '(?m)...$' to anchor at the end of a line.
  In the replacement, \\1..\\99 and \\g<name> refer to groups and '\\\\' is a
  literal backslash.

ARGUMENTS:
  Everything after the script path is passed to the script unchanged.

EXAMPLES:
  replace-run -r 'sleep [0-9]+/true' -- deploy.sh --dry
  replace-run -r 'DEBUG=0/DEBUG=1' 'rm -rf/echo rm -rf' -o -- cleanup.sh
  replace-run -r '(\\S+ ).+/\\1out' --diff -- report.py")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_version = LONG_VERSION)]
struct Cli {
    /// Statements applied to the script in order
    #[arg(short = 'r', long = "replace", value_name = "STATEMENT", num_args = 1.., required = true)]
    #[arg(help = "The statements for replacing the script\nThe format is \"<regular expression>/<replacement>\"\nThe escape sequence is \"\\\" in <regular expression>")]
    statements: Vec<String>,

    /// Print the replaced script instead of running it
    #[arg(short = 'o', long, conflicts_with = "diff")]
    output: bool,

    /// Show what would change instead of running the script
    #[arg(short = 'd', long)]
    #[arg(help = "Show a diff between the original and the replaced script\nThe script is not run")]
    diff: bool,

    /// Enable debug logging for this run
    #[arg(long)]
    debug: bool,

    /// Use a configuration file other than ~/.replace-run/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// The path of a script file
    #[arg(value_name = "SCRIPT")]
    script: PathBuf,
}

/// What to do with the replaced script
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Run,
    Output,
    Diff,
}

#[derive(Debug)]
pub struct Args {
    pub statements: Vec<String>,
    pub script: PathBuf,
    pub script_args: Vec<OsString>,
    pub mode: Mode,
    pub debug: bool,
    pub config: Option<PathBuf>,
}

/// Parse the process arguments, exiting with usage on error
pub fn parse_args() -> Args {
    let (own, forwarded) = split_command_line_arguments(std::env::args_os().skip(1).collect());
    let cli = Cli::parse_from(std::iter::once(OsString::from("replace-run")).chain(own));
    into_args(cli, forwarded)
}

/// Parse an argument list that excludes the program name
pub fn try_parse_args_from<I, T>(argv: I) -> Result<Args>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let (own, forwarded) = split_command_line_arguments(argv.into_iter().map(Into::into).collect());
    let cli = Cli::try_parse_from(std::iter::once(OsString::from("replace-run")).chain(own))?;
    Ok(into_args(cli, forwarded))
}

fn into_args(cli: Cli, script_args: Vec<OsString>) -> Args {
    let mode = if cli.output {
        Mode::Output
    } else if cli.diff {
        Mode::Diff
    } else {
        Mode::Run
    };

    Args {
        statements: cli.statements,
        script: cli.script,
        script_args,
        mode,
        debug: cli.debug,
        config: cli.config,
    }
}

/// Split arguments into our own (up to and including the script) and the script's
///
/// `-r`/`--replace` starts a run of statements that ends at the next
/// argument starting with `-`. The first other non-option argument is the
/// script. If none is found, everything is ours and clap reports the problem.
pub fn split_command_line_arguments(argv: Vec<OsString>) -> (Vec<OsString>, Vec<OsString>) {
    let mut script_index = None;
    let mut in_replace = false;
    let mut skip_value = false;

    for (index, argument) in argv.iter().enumerate() {
        let text = argument.to_string_lossy();

        if skip_value {
            skip_value = false;
        } else if text == "--" {
            if index + 1 < argv.len() {
                script_index = Some(index + 1);
            }
            break;
        } else if text == "-r" || text == "--replace" {
            in_replace = true;
        } else if text.starts_with('-') {
            in_replace = false;
            skip_value = VALUE_OPTIONS.contains(&&*text);
        } else if !in_replace {
            script_index = Some(index);
            break;
        }
    }

    let mut own = argv;
    let forwarded = match script_index {
        Some(index) => own.split_off(index + 1),
        None => Vec::new(),
    };

    (own, forwarded)
}
