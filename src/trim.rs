//! Splits one source video according to a [`SplitPolicy`].

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use failure::Error;
use rand::RngCore;

use crate::boundary::{SplitPolicy, TimeRange, Unit};
use crate::config::Config;
use crate::error::TrimError;
use crate::media::Media;
use crate::naming::{default_output_dir, resolve_output_name};
use crate::prompt::Prompt;

pub const TRIM_START: &str = "Please enter the starting point for the video";
pub const TRIM_END: &str = "Please enter the ending point for the video";

/// Collaborators for one trimming run.
pub struct Trimmer<'a> {
    pub media: &'a mut dyn Media,
    pub prompt: &'a mut dyn Prompt,
    pub out: &'a mut dyn Write,
    pub rng: &'a mut dyn RngCore,
    pub config: &'a Config,
}

impl<'a> Trimmer<'a> {
    /// Splits `source` into `count` equal parts.
    pub fn trim_num_parts(&mut self, source: &Path, count: u32) -> Result<Vec<PathBuf>, Error> {
        self.run(source, SplitPolicy::EqualParts { count })
    }

    /// Cuts one clip between `start` and `end`, given in `unit`. Missing
    /// points are asked for.
    pub fn trim_by(
        &mut self,
        source: &Path,
        unit: Unit,
        start: Option<f64>,
        end: Option<f64>,
    ) -> Result<Vec<PathBuf>, Error> {
        let start = match start {
            Some(start) => start,
            None => self.prompt.ask_number(&format!("{} ({})", TRIM_START, unit))?,
        };
        let end = match end {
            Some(end) => end,
            None => self.prompt.ask_number(&format!("{} ({})", TRIM_END, unit))?,
        };
        self.run(source, SplitPolicy::Range { start, end, unit })
    }

    pub fn run(&mut self, source: &Path, policy: SplitPolicy) -> Result<Vec<PathBuf>, Error> {
        if !source.is_file() {
            return Err(TrimError::invalid_argument(format!(
                "{} is not a file",
                source.display()
            ))
            .into());
        }

        let duration = self.media.duration(source)?;
        tracing::info!("{} is {:.2}s long", source.display(), duration);

        let plan = policy.ranges(duration)?;
        for advisory in &plan.advisories {
            writeln!(self.out, "? {}", advisory)?;
        }
        if let (SplitPolicy::Range { unit, .. }, [range]) = (policy, plan.ranges.as_slice()) {
            writeln!(self.out, "? {}", summary(range, unit, duration))?;
        }

        let dir = self
            .config
            .output_dir
            .clone()
            .unwrap_or_else(|| default_output_dir(source));
        fs::create_dir_all(&dir)?;

        let mut outputs = Vec::with_capacity(plan.ranges.len());
        for (index, range) in plan.ranges.iter().enumerate() {
            let overwrite = self.config.overwrite;
            let prompt = &mut *self.prompt;
            let output = resolve_output_name(
                source,
                &dir,
                index as u32,
                |candidate| candidate.exists(),
                |candidate| {
                    if overwrite {
                        return Ok(true);
                    }
                    prompt.confirm(&format!(
                        "{} exists already. Would you like to overwrite that one?",
                        candidate.display()
                    ))
                },
                &mut *self.rng,
            )?;

            tracing::debug!("part {} [{}] -> {}", index, range, output.display());
            self.media.extract(source, *range, &output)?;
            writeln!(self.out, "Completed trimming {}.", output.display())?;
            outputs.push(output);
        }
        Ok(outputs)
    }
}

/// Describes a custom clip in the unit it was asked in. Other units also
/// show the cut points in seconds.
fn summary(range: &TimeRange, unit: Unit, duration: f64) -> String {
    let to_unit = |seconds: f64| unit.from_seconds(seconds, duration);
    let mut line = format!(
        "Video clip of {:.2} {unit} will be created from {:.2} {unit} to {:.2} {unit}",
        to_unit(range.length()),
        to_unit(range.start()),
        to_unit(range.end()),
    );
    if unit != Unit::Seconds {
        line.push_str(&format!(" ({:.2}s to {:.2}s)", range.start(), range.end()));
    }
    line.push('.');
    line
}
