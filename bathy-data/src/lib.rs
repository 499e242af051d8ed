//! Water elevation interpolation and bottom elevation for depth soundings.
//!
//! For each sounding the engine picks the water level loggers that were
//! switched on at the measurement time, brackets the sounding between two of
//! them along the fairway, interpolates each logger's reading in time and the
//! two results in space, and subtracts the measured depth.

pub mod availability;
pub mod bracket;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod interpolation;
pub mod shoreline;
pub mod survey;

pub use config::{EngineConfig, ExtrapolationPolicy};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticKind, DiagnosticsSink, LogSink};
pub use error::{EngineError, InterpolationError};
pub use survey::{Survey, SurveySummary};

/// Bottom elevation from water elevation and depth.
pub mod bottom {
    /// `water_elevation - depth`, or `None` when either operand is missing.
    pub fn bottom_elevation(water_elevation: Option<f64>, depth: Option<f64>) -> Option<f64> {
        Some(water_elevation? - depth?)
    }

}
