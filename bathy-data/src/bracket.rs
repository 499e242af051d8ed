//! Choosing the two loggers that surround a sounding along the fairway.

use crate::config::ExtrapolationPolicy;
use bathy_geo::{BracketPosition, LoggerPoint, SoundingFailure};

/// The pair of loggers a sounding is interpolated between.
///
/// `lower.distance_from_shore <= upper.distance_from_shore` always holds.
#[derive(Debug, Clone, Copy)]
pub struct Bracket<'a> {
    pub lower: &'a LoggerPoint,
    pub upper: &'a LoggerPoint,
    pub position: BracketPosition,
}

impl Bracket<'_> {
    pub fn lower_distance(&self) -> f64 {
        self.lower.distance_from_shore.unwrap_or_default()
    }

    pub fn upper_distance(&self) -> f64 {
        self.upper.distance_from_shore.unwrap_or_default()
    }
}

/// Select the bracketing pair for `target_distance`.
///
/// Loggers are ordered by distance from shore on a private copy, so the
/// shared logger slice is never reordered. A target closer to shore than
/// every logger yields the two nearest-to-shore loggers (`Below`), a target
/// beyond every logger yields the two farthest (`Above`); under
/// [`ExtrapolationPolicy::Reject`] both cases fail with `OutOfRange`.
pub fn bracket<'a>(
    target_distance: f64,
    usable: &[&'a LoggerPoint],
    policy: ExtrapolationPolicy,
) -> Result<Bracket<'a>, SoundingFailure> {
    let mut sorted: Vec<(&'a LoggerPoint, f64)> = usable
        .iter()
        .filter_map(|logger| logger.distance_from_shore.map(|d| (*logger, d)))
        .collect();
    if sorted.len() < 2 {
        return Err(SoundingFailure::InsufficientLoggers {
            usable: sorted.len(),
        });
    }
    sorted.sort_by(|(_, a), (_, b)| a.total_cmp(b));

    let mut found = None;
    for pair in sorted.windows(2) {
        let ((lower, lower_distance), (upper, upper_distance)) = (pair[0], pair[1]);
        if target_distance < lower_distance {
            found = Some((lower, upper, BracketPosition::Below));
            break;
        }
        if lower_distance <= target_distance && target_distance < upper_distance {
            found = Some((lower, upper, BracketPosition::Interpolated));
            break;
        }
    }
    let (lower, upper, position) = match found {
        Some(found) => found,
        None => {
            let (lower, _) = sorted[sorted.len() - 2];
            let (upper, upper_distance) = sorted[sorted.len() - 1];
            // Sitting exactly on the farthest logger is still inside the range
            let position = if target_distance <= upper_distance {
                BracketPosition::Interpolated
            } else {
                BracketPosition::Above
            };
            (lower, upper, position)
        }
    };

    if position.is_extrapolated() && policy == ExtrapolationPolicy::Reject {
        return Err(SoundingFailure::OutOfRange { position });
    }
    Ok(Bracket {
        lower,
        upper,
        position,
    })
}
