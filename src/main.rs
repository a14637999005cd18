use anyhow::{Context, Result};
use replace_run::cli::{self, Args, Mode};
use replace_run::config::{self, Config};
use replace_run::diff_formatter::DiffFormatter;
use replace_run::{logger, runner, script, ReplaceError};
use std::io::{self, Write};
use tracing::{debug, info};

fn main() {
    let args = cli::parse_args();

    let code = match execute(&args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:#}", e);
            1
        }
    };

    std::process::exit(code);
}

fn execute(args: &Args) -> Result<i32> {
    let config = match &args.config {
        Some(path) => config::load_config_from(path)?,
        None => config::load_config()?,
    };

    let log_path = logger::init_debug_logging(args.debug || config.logging.debug, &config.logging)?;
    if let Some(path) = log_path {
        debug!(log = %path.display(), "debug logging enabled");
    }

    info!(
        script = %args.script.display(),
        statements = args.statements.len(),
        mode = ?args.mode,
        "replace-run started"
    );

    let replacements = script::compile_statements(&args.statements)?;
    let source = script::read_script(&args.script)?;

    let replaced = script::transform_script(&source, &replacements).map_err(|e| match e {
        ReplaceError::NoMatch { index } => anyhow::anyhow!(
            "Statement \"{}\" has not replaced the script.",
            args.statements[index]
        ),
        other => other.into(),
    })?;

    match args.mode {
        Mode::Output => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{}", replaced).context("Failed to write to stdout")?;
            Ok(0)
        }
        Mode::Diff => show_diff(args, &config, &source, &replaced),
        Mode::Run => {
            let code = runner::run_script(&replaced, &args.script, &args.script_args)?;
            info!(code, "script exited");
            Ok(code)
        }
    }
}

fn show_diff(args: &Args, config: &Config, source: &str, replaced: &str) -> Result<i32> {
    let use_color = DiffFormatter::should_use_color(&config.output.color);
    let name = args.script.display().to_string();
    let output = DiffFormatter::format_script_diff(&name, source, replaced, use_color);

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .context("Failed to write to stdout")?;

    Ok(0)
}
