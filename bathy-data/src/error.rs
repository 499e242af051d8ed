/// Error types for the interpolation engine
use thiserror::Error;

/// Fatal errors: the run cannot proceed at all.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("No fairway reference points were supplied")]
    NoFairwayPoints,

    #[error("None of the {0} fairway reference points has valid coordinates")]
    NoValidFairwayPoints(usize),

    #[error("No water level loggers were supplied")]
    NoLoggers,

    #[error("No soundings were supplied")]
    NoSoundings,

    /// Negative, or too large to express as a time span
    #[error("Invalid switch-off threshold: {0} minutes")]
    InvalidSwitchOffMinutes(i64),
}

/// Precondition violations in linear interpolation.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum InterpolationError {
    /// Both interpolation nodes share the same abscissa
    #[error("Degenerate interval: both nodes at {0}")]
    DegenerateInterval(f64),
}

/// Type alias for Results using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;
