use crate::point::{GeoPoint, Located};
use chrono::{NaiveDateTime, SubsecRound};
use std::collections::BTreeMap;
use std::ops::Bound::{Excluded, Unbounded};

/// A single water elevation reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    pub time: NaiveDateTime,
    pub elevation: f64,
}

/// How a logger's readings sit around a given instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Straddle {
    /// A reading exists exactly at the instant
    Exact(Reading),
    /// Closest readings at or before, and strictly after, the instant
    Between { before: Reading, after: Reading },
    /// No reading at or before the instant (logger still collecting)
    NotStarted,
    /// No reading after the instant (logger already stopped)
    Stopped,
}

/// Time series of water elevation readings, keyed by timestamp.
///
/// Keys are strictly increasing. Timestamps are rounded to whole seconds
/// on construction, non-finite readings are dropped, and the first reading
/// wins when two land on the same second.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WaterLevelSeries(BTreeMap<NaiveDateTime, f64>);

impl WaterLevelSeries {
    pub fn from_readings<I>(readings: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDateTime, f64)>,
    {
        let mut series = BTreeMap::new();
        for (time, elevation) in readings {
            if !elevation.is_finite() {
                continue;
            }
            series.entry(time.round_subsecs(0)).or_insert(elevation);
        }
        WaterLevelSeries(series)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<Reading> {
        self.0.first_key_value().map(|(t, v)| Reading {
            time: *t,
            elevation: *v,
        })
    }

    pub fn last(&self) -> Option<Reading> {
        self.0.last_key_value().map(|(t, v)| Reading {
            time: *t,
            elevation: *v,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = Reading> + '_ {
        self.0.iter().map(|(t, v)| Reading {
            time: *t,
            elevation: *v,
        })
    }

    /// Locate the readings surrounding `instant`.
    pub fn straddle(&self, instant: NaiveDateTime) -> Straddle {
        let before = self.0.range(..=instant).next_back();
        let before = match before {
            Some((t, v)) if *t == instant => {
                return Straddle::Exact(Reading {
                    time: *t,
                    elevation: *v,
                })
            }
            Some((t, v)) => Reading {
                time: *t,
                elevation: *v,
            },
            None => return Straddle::NotStarted,
        };
        match self.0.range((Excluded(instant), Unbounded)).next() {
            Some((t, v)) => Straddle::Between {
                before,
                after: Reading {
                    time: *t,
                    elevation: *v,
                },
            },
            None => Straddle::Stopped,
        }
    }
}

/// A fixed water level logger.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggerPoint {
    /// Unique logger name
    pub name: String,
    pub point: GeoPoint,
    /// Derived from the nearest fairway reference, `None` until resolved
    pub distance_from_shore: Option<f64>,
    pub series: WaterLevelSeries,
}

impl LoggerPoint {
    pub fn new(name: &str, point: GeoPoint, series: WaterLevelSeries) -> Self {
        LoggerPoint {
            name: name.to_string(),
            point,
            distance_from_shore: None,
            series,
        }
    }
}

impl Located for LoggerPoint {
    fn geo(&self) -> &GeoPoint {
        &self.point
    }
    fn geo_mut(&mut self) -> &mut GeoPoint {
        &mut self.point
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 6, 3)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    fn series() -> WaterLevelSeries {
        WaterLevelSeries::from_readings(vec![
            (at(10, 30, 0), 1.2),
            (at(10, 0, 0), 1.0),
            (at(10, 10, 0), 1.1),
        ])
    }

    #[test]
    fn test_series_is_sorted() {
        let times: Vec<NaiveDateTime> = series().iter().map(|r| r.time).collect();
        assert_eq!(times, vec![at(10, 0, 0), at(10, 10, 0), at(10, 30, 0)]);
        assert_eq!(series().first().unwrap().elevation, 1.0);
        assert_eq!(series().last().unwrap().elevation, 1.2);
    }

    #[test]
    fn test_series_rounds_and_deduplicates() {
        let jittered = at(10, 0, 0) + chrono::TimeDelta::milliseconds(400);
        let late = at(10, 0, 0) + chrono::TimeDelta::milliseconds(700);
        let s = WaterLevelSeries::from_readings(vec![
            (jittered, 1.0),
            (at(10, 0, 0), 2.0),
            (late, 3.0),
            (at(10, 5, 0), f64::NAN),
        ]);
        assert_eq!(s.len(), 2);
        let readings: Vec<Reading> = s.iter().collect();
        assert_eq!(readings[0].time, at(10, 0, 0));
        assert_eq!(readings[0].elevation, 1.0);
        assert_eq!(readings[1].time, at(10, 0, 1));
    }

    #[test]
    fn test_straddle() {
        let s = series();
        assert_eq!(
            s.straddle(at(10, 10, 0)),
            Straddle::Exact(Reading {
                time: at(10, 10, 0),
                elevation: 1.1
            })
        );
        match s.straddle(at(10, 15, 0)) {
            Straddle::Between { before, after } => {
                assert_eq!(before.time, at(10, 10, 0));
                assert_eq!(after.time, at(10, 30, 0));
            }
            other => panic!("unexpected straddle {:?}", other),
        }
        assert_eq!(s.straddle(at(9, 59, 59)), Straddle::NotStarted);
        assert_eq!(s.straddle(at(10, 30, 1)), Straddle::Stopped);
        // The last reading itself is an exact match
        assert!(matches!(s.straddle(at(10, 30, 0)), Straddle::Exact(_)));
    }

    #[test]
    fn test_straddle_empty_series() {
        let s = WaterLevelSeries::default();
        assert!(s.is_empty());
        assert_eq!(s.straddle(at(10, 0, 0)), Straddle::NotStarted);
    }
}
