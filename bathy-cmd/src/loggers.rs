//! Logger inspection: shore distance, reading span and usability.

use crate::compute::normalizer;
use crate::LoggerInputs;
use bathy_data::availability::check;
use bathy_data::config::{EngineConfig, DEFAULT_SWITCH_OFF_MINUTES};
use bathy_data::shoreline::ShorelineResolver;
use bathy_geo::LoggerPoint;
use bathy_utils::dates::format_timestamp;
use chrono::{NaiveDateTime, TimeDelta};
use log::info;

/// Load fairway and loggers and resolve every logger's shore distance.
pub fn load_resolved_loggers(inputs: &LoggerInputs) -> anyhow::Result<Vec<LoggerPoint>> {
    let normalizer = normalizer(inputs.utm_zone)?;
    let mut fairway = bathy_io::load_fairway(&inputs.fairway_points_filepath)?;
    let mut loggers = bathy_io::load_loggers(
        &inputs.logger_points_filepath,
        &inputs.logger_data_filepath,
    )?;
    bathy_io::report_invalid_points("logger", loggers.iter().map(|l| &l.point));

    normalizer.normalize_all(&mut fairway);
    normalizer.normalize_all(&mut loggers);
    let resolver = ShorelineResolver::new(&fairway)?;
    for logger in loggers.iter_mut() {
        logger.distance_from_shore = resolver.resolve_point(&*logger);
    }
    Ok(loggers)
}

/// One report line per logger.
pub fn describe(logger: &LoggerPoint, at: Option<NaiveDateTime>, threshold: TimeDelta) -> String {
    let distance = logger
        .distance_from_shore
        .map(|d| format!("{:.1}", d))
        .unwrap_or_else(|| String::from("-"));
    let span = match (logger.series.first(), logger.series.last()) {
        (Some(first), Some(last)) => format!(
            "{} .. {}",
            format_timestamp(&first.time),
            format_timestamp(&last.time)
        ),
        _ => String::from("no readings"),
    };
    let mut line = format!(
        "{}: distance {} m, {}, {} readings",
        logger.name,
        distance,
        span,
        logger.series.len()
    );
    if let Some(instant) = at {
        match check(logger, instant, threshold) {
            Ok(()) => line.push_str(", usable"),
            Err(reason) => line.push_str(&format!(", unusable ({})", reason)),
        }
    }
    line
}

/// Validated gap threshold, defaulting to the engine default.
pub fn resolve_threshold(switch_off_minutes: Option<i64>) -> anyhow::Result<TimeDelta> {
    let config = EngineConfig {
        switch_off_minutes: switch_off_minutes.unwrap_or(DEFAULT_SWITCH_OFF_MINUTES),
        ..Default::default()
    };
    config.validate()?;
    Ok(config.switch_off_threshold())
}

pub fn run_loggers(
    inputs: &LoggerInputs,
    at: Option<NaiveDateTime>,
    switch_off_minutes: Option<i64>,
) -> anyhow::Result<()> {
    let threshold = resolve_threshold(switch_off_minutes)?;
    let loggers = load_resolved_loggers(inputs)?;
    if let Some(instant) = at {
        info!("Logger availability at {}", format_timestamp(&instant));
    }
    for logger in &loggers {
        println!("{}", describe(logger, at, threshold));
    }
    Ok(())
}
