use failure::Fail;

use crate::boundary::Unit;

#[derive(Debug, Fail)]
pub enum TrimError {
    #[fail(display = "invalid argument: {}", _0)]
    InvalidArgument(String),

    /// End time is not after start time. Reported on stdout and the process
    /// exits with status 0.
    #[fail(
        display = "The ending time is less than starting time. Please choose value greater than {} {}.",
        start, unit
    )]
    InvalidRange { start: f64, unit: Unit },

    #[fail(display = "failed to process {}: {}", source, message)]
    MediaProcessingFailure { source: String, message: String },
}

impl TrimError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        TrimError::InvalidArgument(message.into())
    }

    pub fn media(source: &std::path::Path, message: impl std::fmt::Display) -> Self {
        TrimError::MediaProcessingFailure {
            source: source.display().to_string(),
            message: message.to_string(),
        }
    }

    /// Process exit status for this error kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            TrimError::InvalidRange { .. } => 0,
            _ => 1,
        }
    }
}
