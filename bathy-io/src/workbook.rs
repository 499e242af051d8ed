//! Logger readings from a spreadsheet workbook.
//!
//! Each worksheet is named after a logger. Column A holds the timestamp,
//! either as a date cell or as text in one of the accepted layouts; column B
//! holds the elevation. Rows that cannot be read are skipped with a warning,
//! the same as in the delimited readings file.

use crate::error::{LoadError, Result};
use crate::loader::LoggerReadings;
use bathy_utils::dates::parse_timestamp;
use bathy_utils::numbers::parse_decimal;
use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::NaiveDateTime;
use log::{info, warn};
use std::path::Path;

/// Extensions read as workbooks rather than delimited text.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

pub fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

fn cell_timestamp(cell: &Data) -> Option<NaiveDateTime> {
    match cell.get_string() {
        Some(text) => parse_timestamp(text).ok(),
        None => cell.as_datetime(),
    }
}

fn cell_elevation(cell: &Data) -> Option<f64> {
    match cell.get_string() {
        Some(text) => parse_decimal(text),
        None => cell.as_f64().filter(|v| v.is_finite()),
    }
}

fn workbook_error(path: &Path, source: calamine::Error) -> LoadError {
    LoadError::Workbook {
        path: path.to_path_buf(),
        source,
    }
}

/// Read every worksheet of the workbook at `path` as one logger's readings.
pub fn load_logger_workbook(path: &Path) -> Result<LoggerReadings> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(path, e))?;
    let mut readings = LoggerReadings::new();
    let mut skipped = 0u32;
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| workbook_error(path, e))?;
        let logger = readings.entry(name.trim().to_string()).or_default();
        for (row_index, row) in range.rows().enumerate() {
            let time = row.first().and_then(cell_timestamp);
            let elevation = row.get(1).and_then(cell_elevation);
            match (time, elevation) {
                (Some(time), Some(elevation)) => logger.push((time, elevation)),
                _ if row.iter().all(|cell| cell.is_empty()) => {}
                _ => {
                    warn!(
                        "Skipping unreadable logger reading in {} (sheet {}, row {})",
                        path.display(),
                        name,
                        row_index + 1
                    );
                    skipped += 1;
                }
            }
        }
    }
    info!(
        "Loaded readings for {} loggers from {}, skipped {} rows",
        readings.len(),
        path.display(),
        skipped
    );
    Ok(readings)
}
