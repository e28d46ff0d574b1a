//! Purpose: `engine-launcher` process entry point.
//! Role: Binary crate root; parses args, resolves config, runs the launcher once.
//! Invariants: stdout carries exactly the launcher's `true`/`false` line.
//! Invariants: All arguments are accepted and ignored; no flag short-circuits a run.
//! Invariants: Exit code is 0 after the foreign call returns, else `to_exit_code`.
//! Invariants: Errors are rendered on stderr (text on a TTY, JSON otherwise).
use std::ffi::OsString;
use std::io;

use clap::Parser;
use engine_launcher::binding::DylibLoader;
use engine_launcher::config::LauncherConfig;
use engine_launcher::core::error::{Error, ErrorKind, to_exit_code};
use engine_launcher::diagnostics::emit_error;
use engine_launcher::launcher::{FsProbe, Launcher};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "engine-launcher",
    version,
    about = "Check for the engine shared library and call its entry point",
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Cli {
    /// Every argument lands here and is ignored, `--help` and `--version` included.
    #[arg(
        value_name = "ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        hide = true
    )]
    passthrough: Vec<OsString>,
}

fn main() {
    let exit_code = match run() {
        Ok(code) => code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let cli = match Cli::try_parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(err) => {
            return Err(Error::new(ErrorKind::Usage)
                .with_message(clap_error_summary(&err))
                .with_hint(
                    "Arguments are ignored; configure the launcher with ENGINE_LAUNCHER_* variables.",
                ));
        }
    };

    init_tracing();
    debug!(ignored_args = cli.passthrough.len(), "arguments accepted and ignored");

    let config = LauncherConfig::from_env()?;
    info!(
        library = %config.library().display(),
        entry = %config.entry(),
        "launching engine"
    );

    let mut launcher = Launcher::new(config, FsProbe, DylibLoader::new());
    let stdout = io::stdout();
    let mut out = stdout.lock();
    launcher.run(&mut out)?;
    Ok(0)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn clap_error_summary(err: &clap::Error) -> String {
    for line in err.to_string().lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("error:") {
            return rest.trim().to_string();
        }
        return trimmed.to_string();
    }
    "invalid arguments".to_string()
}
