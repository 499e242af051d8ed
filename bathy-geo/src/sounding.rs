use crate::point::{GeoPoint, Located};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Where a sounding's shore distance fell relative to the two loggers used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BracketPosition {
    /// Closer to the shore than every usable logger (extrapolated)
    Below,
    /// Between the two loggers
    Interpolated,
    /// Farther from the shore than every usable logger (extrapolated)
    Above,
}

impl BracketPosition {
    pub fn is_extrapolated(&self) -> bool {
        !matches!(self, BracketPosition::Interpolated)
    }
}

impl fmt::Display for BracketPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BracketPosition::Below => "below",
            BracketPosition::Interpolated => "interpolated",
            BracketPosition::Above => "above",
        };
        f.write_str(s)
    }
}

/// Why a sounding has no (or only a partial) result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SoundingFailure {
    #[error("invalid coordinates")]
    InvalidCoordinates,

    #[error("insufficient usable loggers (usable: {usable})")]
    InsufficientLoggers { usable: usize },

    #[error("degenerate bracket between {lower} and {upper}")]
    DegenerateBracket { lower: String, upper: String },

    #[error("outside the logger range ({position})")]
    OutOfRange { position: BracketPosition },

    #[error("logger {0} has no reading around the measurement time")]
    LoggerNotAvailable(String),

    #[error("missing depth")]
    MissingDepth,
}

impl SoundingFailure {
    /// Short machine-friendly tag used in output files and summaries.
    pub fn code(&self) -> &'static str {
        match self {
            SoundingFailure::InvalidCoordinates => "invalid_coordinates",
            SoundingFailure::InsufficientLoggers { .. } => "insufficient_loggers",
            SoundingFailure::DegenerateBracket { .. } => "degenerate_bracket",
            SoundingFailure::OutOfRange { .. } => "out_of_range",
            SoundingFailure::LoggerNotAvailable(_) => "logger_not_available",
            SoundingFailure::MissingDepth => "missing_depth",
        }
    }
}

/// A depth sounding and everything derived for it.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundingPoint {
    pub point: GeoPoint,
    pub measurement_time: NaiveDateTime,
    /// Measured depth in meters, `None` if the input was malformed
    pub depth: Option<f64>,
    pub distance_from_shore: Option<f64>,
    pub water_elevation: Option<f64>,
    pub bottom_elevation: Option<f64>,
    pub lower_logger: Option<String>,
    pub upper_logger: Option<String>,
    pub bracket: Option<BracketPosition>,
    /// Loggers classified unusable at `measurement_time` during the last evaluation
    pub unusable_loggers: Vec<String>,
    pub failure: Option<SoundingFailure>,
}

impl SoundingPoint {
    pub fn new(point: GeoPoint, measurement_time: NaiveDateTime, depth: Option<f64>) -> Self {
        SoundingPoint {
            point,
            measurement_time,
            depth: depth.filter(|d| d.is_finite()),
            distance_from_shore: None,
            water_elevation: None,
            bottom_elevation: None,
            lower_logger: None,
            upper_logger: None,
            bracket: None,
            unusable_loggers: Vec::new(),
            failure: None,
        }
    }

    /// Clear everything a previous evaluation wrote, keeping the shore distance.
    pub fn reset_evaluation(&mut self) {
        self.water_elevation = None;
        self.bottom_elevation = None;
        self.lower_logger = None;
        self.upper_logger = None;
        self.bracket = None;
        self.unusable_loggers.clear();
        self.failure = None;
    }

    /// True when water and bottom elevation and both loggers are populated.
    pub fn is_complete(&self) -> bool {
        self.water_elevation.is_some()
            && self.bottom_elevation.is_some()
            && self.lower_logger.is_some()
            && self.upper_logger.is_some()
    }

    pub fn status(&self) -> &'static str {
        match &self.failure {
            Some(failure) => failure.code(),
            None => "ok",
        }
    }
}

impl Located for SoundingPoint {
    fn geo(&self) -> &GeoPoint {
        &self.point
    }
    fn geo_mut(&mut self) -> &mut GeoPoint {
        &mut self.point
    }
}
