use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, Stdio};

use failure::Error;
use tracing::level_filters::LevelFilter;

use crate::boundary::TimeRange;
use crate::error::TrimError;
use crate::media::Media;

/// Cuts by re-encoding through the system `ffmpeg`, probing with `ffprobe`.
///
/// Slower than [`crate::command::Remux`] but frame accurate.
pub struct Encode {
    ffmpeg: String,
    ffprobe: String,
    loglevel: &'static str,
}

impl Encode {
    pub fn new(log_level: LevelFilter) -> Self {
        Encode {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            loglevel: ffmpeg_loglevel(log_level),
        }
    }

    /// Paths are passed through as-is so non UTF-8 names reach ffmpeg intact.
    fn extract_args(&self, source: &Path, range: TimeRange, output: &Path) -> Vec<OsString> {
        vec![
            "-nostdin".into(),
            "-hide_banner".into(),
            "-loglevel".into(),
            self.loglevel.into(),
            "-ss".into(),
            range.start().to_string().into(),
            "-i".into(),
            source.as_os_str().to_owned(),
            "-t".into(),
            range.length().to_string().into(),
            "-c:v".into(),
            "libx264".into(),
            "-c:a".into(),
            "aac".into(),
            // The caller already settled whether to overwrite.
            "-y".into(),
            output.as_os_str().to_owned(),
        ]
    }
}

/// Value for ffmpeg's `-loglevel` option.
fn ffmpeg_loglevel(level: LevelFilter) -> &'static str {
    if level >= LevelFilter::TRACE {
        "trace"
    } else if level >= LevelFilter::DEBUG {
        "debug"
    } else if level >= LevelFilter::INFO {
        "warning"
    } else if level >= LevelFilter::ERROR {
        "error"
    } else {
        "quiet"
    }
}

fn parse_duration(stdout: &str) -> Option<f64> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.parse::<f64>().ok())
        .filter(|d| d.is_finite() && *d > 0.0)
}

impl Media for Encode {
    fn duration(&mut self, source: &Path) -> Result<f64, Error> {
        let output = Command::new(&self.ffprobe)
            .args(["-v", "error", "-show_entries", "format=duration"])
            .args(["-of", "default=noprint_wrappers=1:nokey=1"])
            .arg(source)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| TrimError::media(source, format!("cannot run {}: {}", self.ffprobe, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TrimError::media(source, stderr.trim()).into());
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_duration(&stdout).ok_or_else(|| {
            TrimError::media(source, format!("unexpected ffprobe output: {:?}", stdout.trim()))
                .into()
        })
    }

    fn extract(&mut self, source: &Path, range: TimeRange, output: &Path) -> Result<(), Error> {
        if !source.exists() {
            return Err(TrimError::media(source, "input file not found").into());
        }

        let args = self.extract_args(source, range, output);
        tracing::debug!("running {} {:?}", self.ffmpeg, args);
        // Prompts share our stdin; ffmpeg must not read the user's answers.
        let status = Command::new(&self.ffmpeg)
            .args(&args)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| TrimError::media(source, format!("cannot run {}: {}", self.ffmpeg, e)))?;

        if !status.success() {
            return Err(TrimError::media(
                source,
                format!("{} failed with exit code: {:?}", self.ffmpeg, status.code()),
            )
            .into());
        }
        Ok(())
    }
}
