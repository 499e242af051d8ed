//! Batch driver: one survey run from loaded points to finished soundings.
//!
//! Loggers and fairway references are read-only once distances are
//! resolved; each sounding only writes its own fields, so evaluation can
//! fan out over the rayon pool without locking.

use crate::availability::classify;
use crate::bottom::bottom_elevation;
use crate::bracket::bracket;
use crate::config::EngineConfig;
use crate::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticsSink};
use crate::error::{EngineError, Result};
use crate::interpolation::water_elevation;
use crate::shoreline::ShorelineResolver;
use bathy_geo::{FairwayReferencePoint, LoggerPoint, Normalizer, SoundingFailure, SoundingPoint};
use log::{debug, info};
use rayon::prelude::*;
use std::collections::BTreeMap;

/// Outcome counts for one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurveySummary {
    pub soundings: usize,
    /// Water and bottom elevation both computed
    pub computed: usize,
    /// Water elevation computed, bottom elevation missing (no depth)
    pub partial: usize,
    /// No water elevation
    pub failed: usize,
    /// Soundings per failure code
    pub failures: BTreeMap<&'static str, usize>,
}

impl SurveySummary {
    fn from_soundings(soundings: &[SoundingPoint]) -> Self {
        let mut summary = SurveySummary {
            soundings: soundings.len(),
            ..Default::default()
        };
        for sounding in soundings {
            if sounding.is_complete() {
                summary.computed += 1;
            } else if sounding.water_elevation.is_some() {
                summary.partial += 1;
            } else {
                summary.failed += 1;
            }
            if let Some(failure) = &sounding.failure {
                *summary.failures.entry(failure.code()).or_insert(0) += 1;
            }
        }
        summary
    }
}

/// All points of one run.
#[derive(Debug, Clone)]
pub struct Survey {
    pub fairway: Vec<FairwayReferencePoint>,
    pub loggers: Vec<LoggerPoint>,
    pub soundings: Vec<SoundingPoint>,
}

impl Survey {
    /// Every collection must be non-empty.
    pub fn new(
        fairway: Vec<FairwayReferencePoint>,
        loggers: Vec<LoggerPoint>,
        soundings: Vec<SoundingPoint>,
    ) -> Result<Self> {
        if fairway.is_empty() {
            return Err(EngineError::NoFairwayPoints);
        }
        if loggers.is_empty() {
            return Err(EngineError::NoLoggers);
        }
        if soundings.is_empty() {
            return Err(EngineError::NoSoundings);
        }
        Ok(Survey {
            fairway,
            loggers,
            soundings,
        })
    }

    /// Project every geographic point; already planar points are skipped.
    pub fn normalize(&mut self, normalizer: &Normalizer) -> usize {
        normalizer.normalize_all(&mut self.fairway)
            + normalizer.normalize_all(&mut self.loggers)
            + normalizer.normalize_all(&mut self.soundings)
    }

    /// Set `distance_from_shore` on loggers and soundings from the nearest
    /// fairway reference.
    pub fn resolve_distances(&mut self, config: &EngineConfig) -> Result<()> {
        let resolver = ShorelineResolver::new(&self.fairway)?;
        for logger in self.loggers.iter_mut() {
            logger.distance_from_shore = resolver.resolve_point(&*logger);
            debug!(
                "Logger {} distance from shore: {:?}",
                logger.name, logger.distance_from_shore
            );
        }
        if config.parallel {
            self.soundings.par_iter_mut().for_each(|sounding| {
                sounding.distance_from_shore = resolver.resolve_point(&*sounding);
            });
        } else {
            for sounding in self.soundings.iter_mut() {
                sounding.distance_from_shore = resolver.resolve_point(&*sounding);
            }
        }
        Ok(())
    }

    /// Compute water and bottom elevation for every sounding.
    pub fn evaluate(
        &mut self,
        config: &EngineConfig,
        sink: &mut dyn DiagnosticsSink,
    ) -> SurveySummary {
        let loggers = &self.loggers;
        let diagnostics: Vec<Vec<Diagnostic>> = if config.parallel {
            self.soundings
                .par_iter_mut()
                .enumerate()
                .map(|(index, sounding)| evaluate_sounding(index, sounding, loggers, config))
                .collect()
        } else {
            self.soundings
                .iter_mut()
                .enumerate()
                .map(|(index, sounding)| evaluate_sounding(index, sounding, loggers, config))
                .collect()
        };
        for diagnostic in diagnostics.into_iter().flatten() {
            sink.record(diagnostic);
        }
        SurveySummary::from_soundings(&self.soundings)
    }

    /// Normalize, resolve distances and evaluate in one go.
    pub fn run(
        &mut self,
        normalizer: &Normalizer,
        config: &EngineConfig,
        sink: &mut dyn DiagnosticsSink,
    ) -> Result<SurveySummary> {
        config.validate()?;
        info!(
            "Survey: {} fairway points, {} loggers, {} soundings",
            self.fairway.len(),
            self.loggers.len(),
            self.soundings.len()
        );
        let normalized = self.normalize(normalizer);
        info!("Normalized {} points to UTM", normalized);
        self.resolve_distances(config)?;
        let summary = self.evaluate(config, sink);
        info!(
            "Evaluated {} soundings: {} computed, {} without depth, {} failed",
            summary.soundings, summary.computed, summary.partial, summary.failed
        );
        Ok(summary)
    }
}

/// Evaluate one sounding against the shared loggers, writing results onto
/// the sounding and returning the diagnostics it raised.
pub fn evaluate_sounding(
    index: usize,
    sounding: &mut SoundingPoint,
    loggers: &[LoggerPoint],
    config: &EngineConfig,
) -> Vec<Diagnostic> {
    sounding.reset_evaluation();
    let source = sounding.point.source_display();
    let mut diagnostics = Vec::new();
    let mut emit = |kind: DiagnosticKind| {
        diagnostics.push(Diagnostic {
            sounding: index,
            source: source.clone(),
            kind,
        })
    };

    let distance = match sounding.distance_from_shore {
        Some(distance) => distance,
        None => {
            let failure = SoundingFailure::InvalidCoordinates;
            emit((&failure).into());
            sounding.failure = Some(failure);
            return diagnostics;
        }
    };

    let availability = classify(
        sounding.measurement_time,
        loggers,
        config.switch_off_threshold(),
    );
    sounding.unusable_loggers = availability.unusable_names();
    if !sounding.unusable_loggers.is_empty() {
        emit(DiagnosticKind::UnusableLoggers {
            names: sounding.unusable_loggers.clone(),
        });
    }

    let computed = bracket(distance, &availability.usable, config.extrapolation).and_then(|b| {
        water_elevation(&b, sounding.measurement_time, distance).map(|elevation| (b, elevation))
    });
    let (selected, elevation) = match computed {
        Ok(computed) => computed,
        Err(failure) => {
            emit((&failure).into());
            sounding.failure = Some(failure);
            return diagnostics;
        }
    };
    sounding.water_elevation = Some(elevation);
    sounding.lower_logger = Some(selected.lower.name.clone());
    sounding.upper_logger = Some(selected.upper.name.clone());
    sounding.bracket = Some(selected.position);
    if selected.position.is_extrapolated() {
        emit(DiagnosticKind::Extrapolated {
            position: selected.position,
        });
    }

    sounding.bottom_elevation = bottom_elevation(sounding.water_elevation, sounding.depth);
    if sounding.bottom_elevation.is_none() {
        let failure = SoundingFailure::MissingDepth;
        emit((&failure).into());
        sounding.failure = Some(failure);
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtrapolationPolicy;
    use crate::diagnostics::CollectingSink;
    use approx::assert_abs_diff_eq;
    use bathy_geo::{BracketPosition, GeoPoint, UtmZone, WaterLevelSeries};
    use chrono::{NaiveDate, NaiveDateTime};

    const ZONE: UtmZone = UtmZone {
        number: 37,
        letter: 'T',
    };

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 6, 3)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn fairway() -> Vec<FairwayReferencePoint> {
        [0.0, 100.0, 200.0, 300.0]
            .iter()
            .map(|d| FairwayReferencePoint::new(GeoPoint::planar(*d, 0.0, ZONE), *d).unwrap())
            .collect()
    }

    fn logger(name: &str, x: f64, readings: &[((u32, u32), f64)]) -> LoggerPoint {
        let series = WaterLevelSeries::from_readings(
            readings.iter().map(|((h, m), v)| (at(*h, *m), *v)),
        );
        LoggerPoint::new(name, GeoPoint::planar(x, 10.0, ZONE), series)
    }

    fn loggers() -> Vec<LoggerPoint> {
        vec![
            logger("A", 0.0, &[((10, 0), 1.0), ((10, 30), 1.2)]),
            logger("B", 200.0, &[((10, 0), 1.4), ((10, 30), 1.6)]),
        ]
    }

    fn sounding(x: f64, time: NaiveDateTime, depth: Option<f64>) -> SoundingPoint {
        SoundingPoint::new(
            GeoPoint::planar(x, 5.0, ZONE).with_source("run_01.csv"),
            time,
            depth,
        )
    }

    // Loggers in these tests read every 30 minutes
    fn config() -> EngineConfig {
        EngineConfig {
            switch_off_minutes: 30,
            ..Default::default()
        }
    }

    fn run(survey: &mut Survey, config: &EngineConfig) -> (SurveySummary, CollectingSink) {
        let mut sink = CollectingSink::new();
        let summary = survey.run(&Normalizer::new(), config, &mut sink).unwrap();
        (summary, sink)
    }

    #[test]
    fn test_midpoint_scenario() {
        let mut survey = Survey::new(
            fairway(),
            loggers(),
            vec![sounding(100.0, at(10, 15), Some(3.0))],
        )
        .unwrap();
        let (summary, sink) = run(&mut survey, &config());
        let s = &survey.soundings[0];
        assert_eq!(s.distance_from_shore, Some(100.0));
        assert_abs_diff_eq!(s.water_elevation.unwrap(), 1.3, epsilon = 1e-9);
        assert_abs_diff_eq!(s.bottom_elevation.unwrap(), -1.7, epsilon = 1e-9);
        assert_eq!(s.lower_logger.as_deref(), Some("A"));
        assert_eq!(s.upper_logger.as_deref(), Some("B"));
        assert_eq!(s.bracket, Some(BracketPosition::Interpolated));
        assert!(s.is_complete());
        assert_eq!(summary.computed, 1);
        assert!(sink.diagnostics.is_empty());
    }

    #[test]
    fn test_gap_leaves_insufficient_loggers() {
        let loggers = vec![
            logger("A", 0.0, &[((9, 55), 1.0), ((10, 5), 1.2)]),
            logger("C", 200.0, &[((9, 0), 1.4), ((11, 0), 1.6)]),
        ];
        let mut survey =
            Survey::new(fairway(), loggers, vec![sounding(100.0, at(10, 0), Some(3.0))]).unwrap();
        let (summary, sink) = run(&mut survey, &EngineConfig::default());
        let s = &survey.soundings[0];
        assert_eq!(s.water_elevation, None);
        assert_eq!(s.bottom_elevation, None);
        assert_eq!(s.lower_logger, None);
        assert_eq!(s.unusable_loggers, vec!["C".to_string()]);
        assert_eq!(
            s.failure,
            Some(SoundingFailure::InsufficientLoggers { usable: 1 })
        );
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures["insufficient_loggers"], 1);
        let kinds: Vec<&str> = sink.diagnostics.iter().map(|d| d.kind.code()).collect();
        assert_eq!(kinds, vec!["unusable_loggers", "insufficient_loggers"]);
    }

    #[test]
    fn test_missing_depth_propagates_null() {
        let mut survey =
            Survey::new(fairway(), loggers(), vec![sounding(100.0, at(10, 15), None)]).unwrap();
        let (summary, sink) = run(&mut survey, &config());
        let s = &survey.soundings[0];
        assert!(s.water_elevation.is_some());
        assert_eq!(s.bottom_elevation, None);
        assert_eq!(s.failure, Some(SoundingFailure::MissingDepth));
        assert_eq!(summary.partial, 1);
        assert_eq!(sink.counts()["missing_depth"], 1);
    }

    #[test]
    fn test_invalid_coordinates() {
        let invalid = SoundingPoint::new(GeoPoint::geographic(120.0, 39.0), at(10, 15), Some(2.0));
        let mut survey = Survey::new(fairway(), loggers(), vec![invalid]).unwrap();
        let (summary, sink) = run(&mut survey, &config());
        let s = &survey.soundings[0];
        assert!(s.point.is_invalid());
        assert_eq!(s.distance_from_shore, None);
        assert_eq!(s.water_elevation, None);
        assert_eq!(s.failure, Some(SoundingFailure::InvalidCoordinates));
        assert_eq!(summary.failed, 1);
        assert_eq!(sink.diagnostics[0].kind, DiagnosticKind::InvalidCoordinates);
    }

    #[test]
    fn test_exact_logger_reading() {
        let mut survey = Survey::new(
            fairway(),
            loggers(),
            vec![sounding(0.0, at(10, 0), Some(1.0))],
        )
        .unwrap();
        run(&mut survey, &config());
        assert_eq!(survey.soundings[0].water_elevation, Some(1.0));
        assert_eq!(survey.soundings[0].bottom_elevation, Some(0.0));
    }

    #[test]
    fn test_extrapolation_policy() {
        let beyond = || vec![sounding(300.0, at(10, 15), Some(2.0))];

        let mut survey = Survey::new(fairway(), loggers(), beyond()).unwrap();
        let (_, sink) = run(&mut survey, &config());
        let s = &survey.soundings[0];
        assert_eq!(s.bracket, Some(BracketPosition::Above));
        assert_abs_diff_eq!(s.water_elevation.unwrap(), 1.7, epsilon = 1e-9);
        assert_eq!(
            sink.diagnostics[0].kind,
            DiagnosticKind::Extrapolated {
                position: BracketPosition::Above
            }
        );

        let config = EngineConfig {
            extrapolation: ExtrapolationPolicy::Reject,
            ..config()
        };
        let mut survey = Survey::new(fairway(), loggers(), beyond()).unwrap();
        run(&mut survey, &config);
        let s = &survey.soundings[0];
        assert_eq!(s.water_elevation, None);
        assert_eq!(
            s.failure,
            Some(SoundingFailure::OutOfRange {
                position: BracketPosition::Above
            })
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let soundings: Vec<SoundingPoint> = (0..40)
            .map(|i| {
                let depth = if i % 7 == 0 { None } else { Some(2.0 + i as f64 * 0.1) };
                sounding(i as f64 * 8.0, at(10, i % 31), depth)
            })
            .collect();
        let mut parallel = Survey::new(fairway(), loggers(), soundings.clone()).unwrap();
        let mut sequential = Survey::new(fairway(), loggers(), soundings).unwrap();
        let (parallel_summary, parallel_sink) = run(&mut parallel, &config());
        let config = EngineConfig {
            parallel: false,
            ..config()
        };
        let (sequential_summary, sequential_sink) = run(&mut sequential, &config);
        assert_eq!(parallel.soundings, sequential.soundings);
        assert_eq!(parallel_summary, sequential_summary);
        assert_eq!(parallel_sink.diagnostics, sequential_sink.diagnostics);
    }

    #[test]
    fn test_reevaluation_clears_previous_result() {
        let mut survey = Survey::new(
            fairway(),
            loggers(),
            vec![sounding(100.0, at(10, 15), Some(3.0))],
        )
        .unwrap();
        run(&mut survey, &config());
        survey.soundings[0].measurement_time = at(12, 0);
        let mut sink = CollectingSink::new();
        survey.evaluate(&config(), &mut sink);
        let s = &survey.soundings[0];
        assert_eq!(s.water_elevation, None);
        assert_eq!(s.lower_logger, None);
        assert_eq!(s.unusable_loggers.len(), 2);
    }

    #[test]
    fn test_empty_collections_are_fatal() {
        assert_eq!(
            Survey::new(vec![], loggers(), vec![sounding(0.0, at(10, 0), None)]).unwrap_err(),
            EngineError::NoFairwayPoints
        );
        assert_eq!(
            Survey::new(fairway(), vec![], vec![sounding(0.0, at(10, 0), None)]).unwrap_err(),
            EngineError::NoLoggers
        );
        assert_eq!(
            Survey::new(fairway(), loggers(), vec![]).unwrap_err(),
            EngineError::NoSoundings
        );
    }

    #[test]
    fn test_run_rejects_unrepresentable_threshold() {
        let mut survey = Survey::new(
            fairway(),
            loggers(),
            vec![sounding(100.0, at(10, 15), Some(3.0))],
        )
        .unwrap();
        let config = EngineConfig {
            switch_off_minutes: i64::MAX / 2,
            ..Default::default()
        };
        let mut sink = CollectingSink::new();
        assert_eq!(
            survey.run(&Normalizer::new(), &config, &mut sink).unwrap_err(),
            EngineError::InvalidSwitchOffMinutes(i64::MAX / 2)
        );
        assert!(survey.soundings[0].water_elevation.is_none());
    }
}
