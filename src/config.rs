use std::path::PathBuf;

use tracing::level_filters::LevelFilter;

use crate::cli::Cli;
use crate::error::TrimError;

/// Environment variable consulted for the log level when no flag is given.
pub const LOG_LEVEL_ENV: &str = "VIDEO_TRIM_LOG_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Engine {
    /// Copy streams in-process with libavformat, starting at the keyframe
    /// before the start point
    Remux,
    /// Re-encode with the system ffmpeg binary (libx264/aac)
    Encode,
}

/// Runtime settings for one invocation, passed explicitly to whatever needs
/// them.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub log_level: LevelFilter,
    pub overwrite: bool,
    pub engine: Engine,
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_level: LevelFilter::INFO,
            overwrite: false,
            engine: Engine::Remux,
            output_dir: None,
        }
    }
}

impl Config {
    /// Builds the configuration from parsed flags. `env_level` is the value of
    /// [`LOG_LEVEL_ENV`], read once by the caller; flags take precedence.
    pub fn from_cli(cli: &Cli, env_level: Option<&str>) -> Result<Config, TrimError> {
        let log_level = if cli.debug {
            LevelFilter::DEBUG
        } else if cli.verbose {
            LevelFilter::INFO
        } else if cli.quiet {
            LevelFilter::WARN
        } else {
            match env_level.map(str::trim).filter(|s| !s.is_empty()) {
                Some(level) => level.parse().map_err(|_| {
                    TrimError::invalid_argument(format!(
                        "{} must be one of off, error, warn, info, debug, trace; got '{}'",
                        LOG_LEVEL_ENV, level
                    ))
                })?,
                None => LevelFilter::INFO,
            }
        };

        let crate::cli::Commands::Trim(args) = &cli.command;
        Ok(Config {
            log_level,
            overwrite: args.overwrite,
            engine: args.engine,
            output_dir: args.output_dir.clone(),
        })
    }
}
