//! Delimited file loading for fairway references, loggers and soundings.
//!
//! Every parser takes the file content as a string slice plus the path it
//! came from, so points keep their origin for diagnostics and tests can feed
//! fixtures through `include_str!`.
//!
//! # File Formats
//!
//! All files are `;`-delimited without headers. Numbers may use a decimal comma.
//!
//! - **Fairway points**: `longitude;latitude;id;distance_from_shore`
//! - **Logger points**: `longitude;latitude;logger_name`
//! - **Logger data**: `logger_name;timestamp;elevation`, or a workbook with
//!   one sheet per logger (see [`crate::workbook`])
//! - **Bathymetry**: `longitude;latitude;depth;id1;id2;id3;time;start_time`

use crate::error::{LoadError, Result};
use crate::workbook::{is_workbook, load_logger_workbook};
use crate::DELIMITER;
use bathy_geo::{FairwayReferencePoint, GeoPoint, LoggerPoint, SoundingPoint, WaterLevelSeries};
use bathy_utils::dates::parse_timestamp;
use bathy_utils::numbers::parse_decimal;
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Fields per fairway row
pub const FAIRWAY_ROW_LENGTH: usize = 4;
/// Fields per logger definition row
pub const LOGGER_ROW_LENGTH: usize = 3;
/// Fields per logger reading row
pub const READING_ROW_LENGTH: usize = 3;
/// Fields per bathymetry row
pub const BATHYMETRY_ROW_LENGTH: usize = 8;

/// Readings grouped by logger name, in file order.
pub type LoggerReadings = BTreeMap<String, Vec<(NaiveDateTime, f64)>>;

fn records(csv_data: &str) -> csv::StringRecordsIntoIter<&[u8]> {
    ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(csv_data.as_bytes())
        .into_records()
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or_default()
}

fn check_length(record: &StringRecord, expected: usize, source: &Path) -> Result<()> {
    if record.len() != expected {
        return Err(LoadError::Format {
            path: source.to_path_buf(),
            line: line_of(record),
            reason: format!("expected {} fields, found {}", expected, record.len()),
        });
    }
    Ok(())
}

/// Longitude comes first in every input file.
fn geo_point(record: &StringRecord, source: &Path) -> GeoPoint {
    let longitude = record.get(0).and_then(parse_decimal);
    let latitude = record.get(1).and_then(parse_decimal);
    GeoPoint::from_parsed(latitude, longitude).with_source(source)
}

/// Read a whole file, mapping a missing file to [`LoadError::NotFound`].
pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))
}

/// Parse fairway reference points.
pub fn parse_fairway_csv(csv_data: &str, source: &Path) -> Result<Vec<FairwayReferencePoint>> {
    let mut fairway = Vec::new();
    for row in records(csv_data) {
        let record = row?;
        check_length(&record, FAIRWAY_ROW_LENGTH, source)?;
        let distance = record
            .get(3)
            .and_then(parse_decimal)
            .ok_or_else(|| LoadError::Format {
                path: source.to_path_buf(),
                line: line_of(&record),
                reason: String::from("distance from shore is not a number"),
            })?;
        let point = FairwayReferencePoint::new(geo_point(&record, source), distance).map_err(
            |e| LoadError::Format {
                path: source.to_path_buf(),
                line: line_of(&record),
                reason: e.to_string(),
            },
        )?;
        fairway.push(point);
    }
    Ok(fairway)
}

/// Parse logger definitions. Series are attached later by [`build_loggers`].
pub fn parse_logger_points_csv(csv_data: &str, source: &Path) -> Result<Vec<LoggerPoint>> {
    let mut loggers = Vec::new();
    for row in records(csv_data) {
        let record = row?;
        check_length(&record, LOGGER_ROW_LENGTH, source)?;
        let name = record.get(2).unwrap_or_default();
        if name.is_empty() {
            return Err(LoadError::Format {
                path: source.to_path_buf(),
                line: line_of(&record),
                reason: String::from("empty logger name"),
            });
        }
        loggers.push(LoggerPoint::new(
            name,
            geo_point(&record, source),
            WaterLevelSeries::default(),
        ));
    }
    Ok(loggers)
}

/// Parse logger readings. Rows with an unreadable timestamp or elevation
/// are skipped with a warning.
pub fn parse_logger_readings_csv(csv_data: &str, source: &Path) -> Result<LoggerReadings> {
    let mut readings = LoggerReadings::new();
    let mut skipped = 0u32;
    for row in records(csv_data) {
        let record = row?;
        check_length(&record, READING_ROW_LENGTH, source)?;
        let name = record.get(0).unwrap_or_default();
        let time = record.get(1).map(parse_timestamp);
        let elevation = record.get(2).and_then(parse_decimal);
        match (time, elevation) {
            (Some(Ok(time)), Some(elevation)) if !name.is_empty() => {
                readings
                    .entry(name.to_string())
                    .or_default()
                    .push((time, elevation));
            }
            _ => {
                warn!(
                    "Skipping unreadable logger reading in {} (line {})",
                    source.display(),
                    line_of(&record)
                );
                skipped += 1;
            }
        }
    }
    info!(
        "Loaded readings for {} loggers from {}, skipped {} rows",
        readings.len(),
        source.display(),
        skipped
    );
    Ok(readings)
}

/// Attach readings to logger definitions by name.
pub fn build_loggers(mut loggers: Vec<LoggerPoint>, mut readings: LoggerReadings) -> Vec<LoggerPoint> {
    for logger in loggers.iter_mut() {
        match readings.remove(&logger.name) {
            Some(series) => logger.series = WaterLevelSeries::from_readings(series),
            None => warn!("WARNING! Logger {} has no readings", logger.name),
        }
    }
    for name in readings.keys() {
        warn!("WARNING! Readings for unknown logger {} ignored", name);
    }
    loggers
}

/// Parse one bathymetry file into soundings.
pub fn parse_bathymetry_csv(csv_data: &str, source: &Path) -> Result<Vec<SoundingPoint>> {
    let mut soundings = Vec::new();
    for row in records(csv_data) {
        let record = row?;
        check_length(&record, BATHYMETRY_ROW_LENGTH, source)?;
        let time = parse_timestamp(record.get(6).unwrap_or_default()).map_err(|e| {
            LoadError::Format {
                path: source.to_path_buf(),
                line: line_of(&record),
                reason: e.to_string(),
            }
        })?;
        let depth = record.get(2).and_then(parse_decimal);
        soundings.push(SoundingPoint::new(geo_point(&record, source), time, depth));
    }
    Ok(soundings)
}

/// All `*.csv` files directly inside `directory`, sorted by path.
pub fn bathymetry_file_paths(directory: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(directory).map_err(|e| LoadError::io(directory, e))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| LoadError::io(directory, e))?.path();
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if path.is_file() && is_csv {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

pub fn load_fairway(path: &Path) -> Result<Vec<FairwayReferencePoint>> {
    let fairway = parse_fairway_csv(&read_file(path)?, path)?;
    info!("Loaded {} fairway points from {}", fairway.len(), path.display());
    Ok(fairway)
}

/// Readings from a workbook (one sheet per logger) or a delimited file,
/// chosen by extension.
pub fn load_logger_readings(path: &Path) -> Result<LoggerReadings> {
    if is_workbook(path) {
        load_logger_workbook(path)
    } else {
        parse_logger_readings_csv(&read_file(path)?, path)
    }
}

pub fn load_loggers(points_path: &Path, readings_path: &Path) -> Result<Vec<LoggerPoint>> {
    let points = parse_logger_points_csv(&read_file(points_path)?, points_path)?;
    let readings = load_logger_readings(readings_path)?;
    info!("Loaded {} loggers from {}", points.len(), points_path.display());
    Ok(build_loggers(points, readings))
}

/// Load every bathymetry file in a directory.
pub fn load_bathymetry(directory: &Path) -> Result<Vec<SoundingPoint>> {
    let mut soundings = Vec::new();
    for path in bathymetry_file_paths(directory)? {
        let batch = parse_bathymetry_csv(&read_file(&path)?, &path)?;
        info!("Loaded {} soundings from {}", batch.len(), path.display());
        soundings.extend(batch);
    }
    Ok(soundings)
}

/// Warn about every point that has no usable coordinates.
pub fn report_invalid_points<'a, I>(label: &str, points: I) -> usize
where
    I: IntoIterator<Item = &'a GeoPoint>,
{
    let mut count = 0;
    for point in points.into_iter().filter(|p| p.is_invalid()) {
        warn!("WARNING! Invalid {} point in {}", label, point.source_display());
        count += 1;
    }
    count
}
