//! Which loggers can be trusted at a given instant.
//!
//! A logger is usable when it has a reading exactly at the instant, or
//! readings on both sides of it no further apart than the switch-off
//! threshold. Longer gaps mean the logger was switched off or lost data.

use bathy_geo::{LoggerPoint, Straddle};
use chrono::{NaiveDateTime, TimeDelta};
use std::fmt;

/// Why a logger cannot be used at an instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnusableReason {
    /// Logger coordinates were invalid, so it has no shore distance
    NoDistanceFromShore,
    /// No reading at or before the instant
    NotStarted,
    /// No reading after the instant
    Stopped,
    /// Readings around the instant are further apart than the threshold
    Gap(TimeDelta),
}

impl fmt::Display for UnusableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnusableReason::NoDistanceFromShore => write!(f, "no distance from shore"),
            UnusableReason::NotStarted => write!(f, "not started yet"),
            UnusableReason::Stopped => write!(f, "already stopped"),
            UnusableReason::Gap(gap) => write!(f, "{} min gap in readings", gap.num_minutes()),
        }
    }
}

/// Loggers split by usability at one instant. Every input logger appears in
/// exactly one of the two lists, in input order.
#[derive(Debug, Default)]
pub struct Availability<'a> {
    pub usable: Vec<&'a LoggerPoint>,
    pub unusable: Vec<(&'a LoggerPoint, UnusableReason)>,
}

impl Availability<'_> {
    pub fn unusable_names(&self) -> Vec<String> {
        self.unusable
            .iter()
            .map(|(logger, _)| logger.name.clone())
            .collect()
    }
}

/// Usability of a single logger at `instant`.
pub fn check(
    logger: &LoggerPoint,
    instant: NaiveDateTime,
    threshold: TimeDelta,
) -> Result<(), UnusableReason> {
    if logger.distance_from_shore.is_none() {
        return Err(UnusableReason::NoDistanceFromShore);
    }
    match logger.series.straddle(instant) {
        Straddle::Exact(_) => Ok(()),
        Straddle::Between { before, after } => {
            let gap = after.time - before.time;
            if gap <= threshold {
                Ok(())
            } else {
                Err(UnusableReason::Gap(gap))
            }
        }
        Straddle::NotStarted => Err(UnusableReason::NotStarted),
        Straddle::Stopped => Err(UnusableReason::Stopped),
    }
}

/// Classify every logger at `instant`.
pub fn classify<'a>(
    instant: NaiveDateTime,
    loggers: &'a [LoggerPoint],
    threshold: TimeDelta,
) -> Availability<'a> {
    let mut availability = Availability::default();
    for logger in loggers {
        match check(logger, instant, threshold) {
            Ok(()) => availability.usable.push(logger),
            Err(reason) => availability.unusable.push((logger, reason)),
        }
    }
    availability
}
