mod boundary;
mod cli;
mod command;
mod config;
mod encode;
mod error;
mod media;
mod naming;
mod prompt;
mod trim;

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use failure::Error;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands, TrimArgs, TrimMode};
use config::{Config, LOG_LEVEL_ENV};
use error::TrimError;
use prompt::{Prompt, Terminal};
use trim::Trimmer;

const SELECT_FILE: &str = "Please select the file to consider for trimming?";

fn main() {
    let cli = Cli::parse();
    let env_level = std::env::var(LOG_LEVEL_ENV).ok();

    let config = match Config::from_cli(&cli, env_level.as_deref()) {
        Ok(config) => config,
        Err(e) => std::process::exit(report_stdio(&e.into())),
    };
    init_logging(&config);

    let code = match run(cli.command, &config) {
        Ok(()) => 0,
        Err(e) => report_stdio(&e),
    };
    std::process::exit(code);
}

/// `RUST_LOG` overrides the configured level when set.
fn init_logging(config: &Config) {
    let filter = EnvFilter::builder()
        .with_default_directive(config.log_level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn report_stdio(err: &Error) -> i32 {
    report(err, &mut io::stdout(), &mut io::stderr())
}

/// Prints `err` and returns the exit status for it.
///
/// An invalid range is a user-facing notice on stdout and exits 0; every
/// other failure goes to stderr and exits 1.
fn report(err: &Error, out: &mut dyn Write, err_out: &mut dyn Write) -> i32 {
    // Nothing useful can be done if the terminal itself is gone.
    let (code, _) = match err.downcast_ref::<TrimError>() {
        Some(e @ TrimError::InvalidRange { .. }) => (e.exit_code(), writeln!(out, "? {}", e)),
        Some(e) => (e.exit_code(), writeln!(err_out, "error: {}", e)),
        None => (1, writeln!(err_out, "error: {}", err)),
    };
    code
}

fn run(command: Commands, config: &Config) -> Result<(), Error> {
    match command {
        Commands::Trim(args) => run_trim(args, config),
    }
}

fn run_trim(args: TrimArgs, config: &Config) -> Result<(), Error> {
    let mut prompt = Terminal::stdio();
    let source = match args.path {
        Some(path) => path,
        None => {
            let cwd: PathBuf = std::env::current_dir()?;
            prompt.select_file(SELECT_FILE, &cwd)?
        }
    };

    let mut media = media::open(config)?;
    let mut stdout = io::stdout();
    let mut rng = rand::thread_rng();
    let mut trimmer = Trimmer {
        media: media.as_mut(),
        prompt: &mut prompt,
        out: &mut stdout,
        rng: &mut rng,
        config,
    };

    let outputs = match args.mode {
        None => trimmer.trim_num_parts(&source, args.parts)?,
        Some(TrimMode::Auto { parts }) => trimmer.trim_num_parts(&source, parts)?,
        Some(TrimMode::Custom { by, start, end }) => trimmer.trim_by(&source, by, start, end)?,
    };
    tracing::info!("wrote {} clip(s) from {}", outputs.len(), source.display());
    Ok(())
}
