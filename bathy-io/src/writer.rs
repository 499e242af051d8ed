//! Output of evaluated soundings as a `;`-delimited file with a header row.

use crate::error::{LoadError, Result};
use crate::DELIMITER;
use bathy_geo::{BracketPosition, SoundingPoint};
use bathy_utils::dates::format_timestamp;
use csv::WriterBuilder;
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// One output row. Missing values are written as empty fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundingRecord {
    pub source_file: String,
    pub easting: Option<f64>,
    pub northing: Option<f64>,
    pub utm_zone: Option<String>,
    pub measurement_time: String,
    pub depth: Option<f64>,
    pub distance_from_shore: Option<f64>,
    pub water_elevation: Option<f64>,
    pub bottom_elevation: Option<f64>,
    pub lower_logger: Option<String>,
    pub upper_logger: Option<String>,
    pub bracket: Option<BracketPosition>,
    pub status: String,
}

impl From<&SoundingPoint> for SoundingRecord {
    fn from(sounding: &SoundingPoint) -> Self {
        let planar = sounding.point.planar_position();
        SoundingRecord {
            source_file: sounding.point.source_display(),
            easting: planar.map(|p| p.x),
            northing: planar.map(|p| p.y),
            utm_zone: planar.map(|p| p.zone.to_string()),
            measurement_time: format_timestamp(&sounding.measurement_time),
            depth: sounding.depth,
            distance_from_shore: sounding.distance_from_shore,
            water_elevation: sounding.water_elevation,
            bottom_elevation: sounding.bottom_elevation,
            lower_logger: sounding.lower_logger.clone(),
            upper_logger: sounding.upper_logger.clone(),
            bracket: sounding.bracket,
            status: sounding.status().to_string(),
        }
    }
}

/// Write all soundings in order, returning the number of rows written.
pub fn write_soundings<W: Write>(writer: W, soundings: &[SoundingPoint]) -> Result<usize> {
    let mut wtr = WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .from_writer(writer);
    for sounding in soundings {
        wtr.serialize(SoundingRecord::from(sounding))?;
    }
    wtr.flush().map_err(|e| LoadError::Csv(csv::Error::from(e)))?;
    Ok(soundings.len())
}

pub fn write_soundings_to_path(path: &Path, soundings: &[SoundingPoint]) -> Result<usize> {
    let file = File::create(path).map_err(|e| LoadError::io(path, e))?;
    let written = write_soundings(file, soundings)?;
    info!("Wrote {} soundings to {}", written, path.display());
    Ok(written)
}
