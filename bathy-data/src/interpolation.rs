//! Two-stage linear interpolation of water elevation: first in time at each
//! bracketing logger, then in space along the fairway.

use crate::bracket::Bracket;
use crate::error::InterpolationError;
use bathy_geo::{LoggerPoint, SoundingFailure, Straddle};
use chrono::NaiveDateTime;

/// Evaluate the line through `(x0, y0)` and `(x1, y1)` at `x`.
///
/// The nodes must have distinct abscissae. Evaluating at either node
/// returns that node's ordinate exactly.
pub fn linear(x0: f64, y0: f64, x1: f64, y1: f64, x: f64) -> Result<f64, InterpolationError> {
    if x0 == x1 {
        return Err(InterpolationError::DegenerateInterval(x0));
    }
    if x == x0 {
        return Ok(y0);
    }
    let slope = (y0 - y1) / (x0 - x1);
    Ok(y1 + slope * (x - x1))
}

/// Seconds since the Unix epoch, as used for the temporal stage.
pub fn epoch_seconds(time: NaiveDateTime) -> f64 {
    let utc = time.and_utc();
    utc.timestamp() as f64 + utc.timestamp_subsec_nanos() as f64 * 1e-9
}

/// Water elevation recorded by `logger` at `instant`, interpolated between
/// the readings either side of it.
pub fn elevation_at(logger: &LoggerPoint, instant: NaiveDateTime) -> Result<f64, SoundingFailure> {
    match logger.series.straddle(instant) {
        Straddle::Exact(reading) => Ok(reading.elevation),
        Straddle::Between { before, after } => linear(
            epoch_seconds(before.time),
            before.elevation,
            epoch_seconds(after.time),
            after.elevation,
            epoch_seconds(instant),
        )
        .map_err(|_| SoundingFailure::DegenerateBracket {
            lower: logger.name.clone(),
            upper: logger.name.clone(),
        }),
        Straddle::NotStarted | Straddle::Stopped => {
            Err(SoundingFailure::LoggerNotAvailable(logger.name.clone()))
        }
    }
}

/// Water elevation at a sounding taken at `instant`, `distance_from_shore`
/// meters along the fairway, between the two loggers of `bracket`.
pub fn water_elevation(
    bracket: &Bracket,
    instant: NaiveDateTime,
    distance_from_shore: f64,
) -> Result<f64, SoundingFailure> {
    let lower_elevation = elevation_at(bracket.lower, instant)?;
    let upper_elevation = elevation_at(bracket.upper, instant)?;
    linear(
        bracket.lower_distance(),
        lower_elevation,
        bracket.upper_distance(),
        upper_elevation,
        distance_from_shore,
    )
    .map_err(|_| SoundingFailure::DegenerateBracket {
        lower: bracket.lower.name.clone(),
        upper: bracket.upper.name.clone(),
    })
}
