use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::boundary::Unit;
use crate::config::Engine;

/// Parts produced when no count is given.
pub const DEFAULT_PARTS: u32 = 24;

#[derive(Parser, Debug)]
#[command(name = "video_trim")]
#[command(version, about = "Trims videos into smaller clips for further processing")]
pub struct Cli {
    /// Give more output
    #[arg(short, long, global = true, conflicts_with_all = ["debug", "quiet"])]
    pub verbose: bool,

    /// Print all debugging statements
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub debug: bool,

    /// Give less output (warnings and errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Trim a video into equal parts or by a custom range
    ///
    /// Clips are written to a directory named after the video, next to it,
    /// unless --output-dir is given.
    Trim(TrimArgs),
}

#[derive(Args, Debug)]
pub struct TrimArgs {
    /// Path of the video file (asked interactively when omitted)
    #[arg(long, global = true, value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Directory clips are written to
    #[arg(long, global = true, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Overwrite existing clips without asking
    #[arg(long, global = true)]
    pub overwrite: bool,

    /// Backend used to cut the video
    #[arg(long, global = true, value_enum, default_value_t = Engine::Remux)]
    pub engine: Engine,

    /// Number of parts to split the video in
    #[arg(long, value_name = "NUMBER", default_value_t = DEFAULT_PARTS)]
    pub parts: u32,

    #[command(subcommand)]
    pub mode: Option<TrimMode>,
}

#[derive(Subcommand, Debug)]
pub enum TrimMode {
    /// Trim the video automatically into equal parts
    Auto {
        /// Number of parts to split the video in
        #[arg(long, value_name = "NUMBER", default_value_t = DEFAULT_PARTS)]
        parts: u32,
    },

    /// Trim a selected portion of the video
    Custom {
        /// Unit of the start and end points: secs, mins or percentage
        #[arg(long, value_name = "UNIT", default_value = "mins")]
        by: Unit,

        /// Starting point (asked interactively when omitted)
        #[arg(long, allow_negative_numbers = true)]
        start: Option<f64>,

        /// Ending point (asked interactively when omitted)
        #[arg(long, allow_negative_numbers = true)]
        end: Option<f64>,
    },
}
