//! Advisory events raised while evaluating soundings.
//!
//! Diagnostics never change control flow. The survey collects them per
//! sounding and hands them to a [`DiagnosticsSink`] in sounding order.

use bathy_geo::{BracketPosition, SoundingFailure};
use log::{info, warn};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    /// Loggers not usable at the sounding's measurement time
    UnusableLoggers { names: Vec<String> },
    InsufficientLoggers { usable: usize },
    InvalidCoordinates,
    DegenerateBracket { lower: String, upper: String },
    /// Result was extrapolated beyond the usable loggers
    Extrapolated { position: BracketPosition },
    OutOfRange { position: BracketPosition },
    LoggerNotAvailable { name: String },
    MissingDepth,
}

impl DiagnosticKind {
    pub fn code(&self) -> &'static str {
        match self {
            DiagnosticKind::UnusableLoggers { .. } => "unusable_loggers",
            DiagnosticKind::InsufficientLoggers { .. } => "insufficient_loggers",
            DiagnosticKind::InvalidCoordinates => "invalid_coordinates",
            DiagnosticKind::DegenerateBracket { .. } => "degenerate_bracket",
            DiagnosticKind::Extrapolated { .. } => "extrapolated",
            DiagnosticKind::OutOfRange { .. } => "out_of_range",
            DiagnosticKind::LoggerNotAvailable { .. } => "logger_not_available",
            DiagnosticKind::MissingDepth => "missing_depth",
        }
    }

    /// Everything except a successful extrapolation is a warning.
    pub fn is_warning(&self) -> bool {
        !matches!(self, DiagnosticKind::Extrapolated { .. })
    }
}

impl From<&SoundingFailure> for DiagnosticKind {
    fn from(failure: &SoundingFailure) -> Self {
        match failure {
            SoundingFailure::InvalidCoordinates => DiagnosticKind::InvalidCoordinates,
            SoundingFailure::InsufficientLoggers { usable } => {
                DiagnosticKind::InsufficientLoggers { usable: *usable }
            }
            SoundingFailure::DegenerateBracket { lower, upper } => {
                DiagnosticKind::DegenerateBracket {
                    lower: lower.clone(),
                    upper: upper.clone(),
                }
            }
            SoundingFailure::OutOfRange { position } => DiagnosticKind::OutOfRange {
                position: *position,
            },
            SoundingFailure::LoggerNotAvailable(name) => {
                DiagnosticKind::LoggerNotAvailable { name: name.clone() }
            }
            SoundingFailure::MissingDepth => DiagnosticKind::MissingDepth,
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::UnusableLoggers { names } => {
                write!(f, "loggers switched off: {}", names.join(", "))
            }
            DiagnosticKind::InsufficientLoggers { usable } => {
                write!(f, "fewer than two usable loggers ({} usable)", usable)
            }
            DiagnosticKind::InvalidCoordinates => write!(f, "invalid coordinates"),
            DiagnosticKind::DegenerateBracket { lower, upper } => write!(
                f,
                "loggers {} and {} cannot be interpolated between",
                lower, upper
            ),
            DiagnosticKind::Extrapolated { position } => {
                write!(f, "water elevation extrapolated ({})", position)
            }
            DiagnosticKind::OutOfRange { position } => {
                write!(f, "outside the logger range ({}), not extrapolated", position)
            }
            DiagnosticKind::LoggerNotAvailable { name } => {
                write!(f, "logger {} has no reading at the measurement time", name)
            }
            DiagnosticKind::MissingDepth => write!(f, "missing depth"),
        }
    }
}

/// One event about one sounding.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Index of the sounding in the survey
    pub sounding: usize,
    /// File the sounding was read from
    pub source: String,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sounding #{} ({}): {}", self.sounding, self.source, self.kind)
    }
}

/// Receiver for diagnostics.
pub trait DiagnosticsSink {
    fn record(&mut self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn record(&mut self, diagnostic: Diagnostic) {
        if diagnostic.kind.is_warning() {
            warn!("WARNING! {}", diagnostic);
        } else {
            info!("{}", diagnostic);
        }
    }
}

/// Keeps diagnostics in memory for later inspection.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    pub diagnostics: Vec<Diagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        CollectingSink::default()
    }

    /// Number of diagnostics per kind code.
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for diagnostic in &self.diagnostics {
            *counts.entry(diagnostic.kind.code()).or_insert(0) += 1;
        }
        counts
    }

    /// Diagnostics raised for one sounding.
    pub fn for_sounding(&self, index: usize) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.sounding == index)
            .collect()
    }
}

impl DiagnosticsSink for CollectingSink {
    fn record(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagnostic(sounding: usize, kind: DiagnosticKind) -> Diagnostic {
        Diagnostic {
            sounding,
            source: String::from("run_01.csv"),
            kind,
        }
    }

    #[test]
    fn test_collecting_sink_counts() {
        let mut sink = CollectingSink::new();
        sink.record(diagnostic(0, DiagnosticKind::MissingDepth));
        sink.record(diagnostic(1, DiagnosticKind::MissingDepth));
        sink.record(diagnostic(1, DiagnosticKind::InvalidCoordinates));
        let counts = sink.counts();
        assert_eq!(counts["missing_depth"], 2);
        assert_eq!(counts["invalid_coordinates"], 1);
        assert_eq!(sink.for_sounding(1).len(), 2);
    }

    #[test]
    fn test_display() {
        let d = diagnostic(
            3,
            DiagnosticKind::UnusableLoggers {
                names: vec!["L1".to_string(), "L4".to_string()],
            },
        );
        assert_eq!(
            d.to_string(),
            "sounding #3 (run_01.csv): loggers switched off: L1, L4"
        );
    }

    #[test]
    fn test_from_failure() {
        let kind: DiagnosticKind = (&SoundingFailure::InsufficientLoggers { usable: 1 }).into();
        assert_eq!(kind, DiagnosticKind::InsufficientLoggers { usable: 1 });
        assert!(kind.is_warning());
        assert!(!DiagnosticKind::Extrapolated {
            position: BracketPosition::Above
        }
        .is_warning());
    }
}
