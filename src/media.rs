use std::path::Path;

use failure::Error;

use crate::boundary::TimeRange;
use crate::command::Remux;
use crate::config::{Config, Engine};
use crate::encode::Encode;

/// Backend that reads media metadata and cuts sub-ranges out of a source.
pub trait Media {
    /// Total length of `source` in seconds.
    fn duration(&mut self, source: &Path) -> Result<f64, Error>;

    /// Writes the part of `source` covered by `range` to `output`,
    /// replacing any file already there.
    fn extract(&mut self, source: &Path, range: TimeRange, output: &Path) -> Result<(), Error>;
}

pub fn open(config: &Config) -> Result<Box<dyn Media>, Error> {
    Ok(match config.engine {
        Engine::Remux => Box::new(Remux::new(config.log_level)?),
        Engine::Encode => Box::new(Encode::new(config.log_level)),
    })
}
