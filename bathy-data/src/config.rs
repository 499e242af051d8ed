use crate::error::{EngineError, Result};
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Default maximum gap between two logger readings for the logger to be
/// considered switched on, in minutes.
pub const DEFAULT_SWITCH_OFF_MINUTES: i64 = 15;

/// What to do when a sounding lies outside the shore-distance range of the
/// usable loggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtrapolationPolicy {
    /// Extrapolate from the two nearest loggers and tag the result
    #[default]
    Allow,
    /// Leave the sounding without a result
    Reject,
}

/// Tunables for one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub switch_off_minutes: i64,
    pub extrapolation: ExtrapolationPolicy,
    /// Evaluate soundings on the rayon thread pool
    pub parallel: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            switch_off_minutes: DEFAULT_SWITCH_OFF_MINUTES,
            extrapolation: ExtrapolationPolicy::Allow,
            parallel: true,
        }
    }
}

impl EngineConfig {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        let representable = TimeDelta::try_minutes(self.switch_off_minutes).is_some();
        if self.switch_off_minutes < 0 || !representable {
            return Err(EngineError::InvalidSwitchOffMinutes(self.switch_off_minutes));
        }
        Ok(())
    }

    /// Gap threshold as a time span, saturating for values `validate` rejects.
    pub fn switch_off_threshold(&self) -> TimeDelta {
        TimeDelta::try_minutes(self.switch_off_minutes).unwrap_or(TimeDelta::MAX)
    }
}
