//! Full pipeline: load inputs, evaluate every sounding, write the output file.

use crate::LoggerInputs;
use anyhow::Context;
use bathy_data::{EngineConfig, ExtrapolationPolicy, LogSink, Survey, SurveySummary};
use bathy_geo::Normalizer;
use log::info;
use std::path::Path;

/// Command-line settings applied on top of the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub switch_off_minutes: Option<i64>,
    pub reject_extrapolation: bool,
    pub sequential: bool,
}

/// Defaults, then the optional JSON file, then command-line flags.
pub fn resolve_config(path: Option<&Path>, overrides: &Overrides) -> anyhow::Result<EngineConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Can not find {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("The wrong format of data in {}", path.display()))?
        }
        None => EngineConfig::default(),
    };
    if let Some(minutes) = overrides.switch_off_minutes {
        config.switch_off_minutes = minutes;
    }
    if overrides.reject_extrapolation {
        config.extrapolation = ExtrapolationPolicy::Reject;
    }
    if overrides.sequential {
        config.parallel = false;
    }
    config.validate()?;
    Ok(config)
}

pub fn normalizer(utm_zone: Option<u8>) -> anyhow::Result<Normalizer> {
    match utm_zone {
        Some(zone) => Ok(Normalizer::with_zone(zone)?),
        None => Ok(Normalizer::new()),
    }
}

/// Load every input and build the survey.
pub fn load_survey(bathymetry_directory: &Path, inputs: &LoggerInputs) -> anyhow::Result<Survey> {
    let fairway = bathy_io::load_fairway(&inputs.fairway_points_filepath)?;
    let loggers = bathy_io::load_loggers(
        &inputs.logger_points_filepath,
        &inputs.logger_data_filepath,
    )?;
    let soundings = bathy_io::load_bathymetry(bathymetry_directory)?;

    bathy_io::report_invalid_points("fairway", fairway.iter().map(|f| &f.point));
    bathy_io::report_invalid_points("logger", loggers.iter().map(|l| &l.point));
    bathy_io::report_invalid_points("sounding", soundings.iter().map(|s| &s.point));

    let survey = Survey::new(fairway, loggers, soundings).with_context(|| {
        format!(
            "Can not build survey from {}",
            bathymetry_directory.display()
        )
    })?;
    Ok(survey)
}

pub fn run_compute(
    bathymetry_directory: &Path,
    inputs: &LoggerInputs,
    output_filepath: &Path,
    config: &EngineConfig,
) -> anyhow::Result<SurveySummary> {
    let normalizer = normalizer(inputs.utm_zone)?;
    let mut survey = load_survey(bathymetry_directory, inputs)?;
    let summary = survey.run(&normalizer, config, &mut LogSink)?;
    bathy_io::write_soundings_to_path(output_filepath, &survey.soundings)?;

    info!(
        "Computed {} of {} soundings ({} without depth, {} failed)",
        summary.computed, summary.soundings, summary.partial, summary.failed
    );
    for (reason, count) in &summary.failures {
        info!("  {}: {}", reason, count);
    }
    info!("Output: {}", output_filepath.display());
    Ok(summary)
}
