//! Reading survey inputs and writing evaluated soundings.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! let fairway = bathy_io::load_fairway(Path::new("fairway_points.csv")).unwrap();
//! let loggers = bathy_io::load_loggers(
//!     Path::new("logger_points.csv"),
//!     Path::new("logger_data.csv"),
//! )
//! .unwrap();
//! let soundings = bathy_io::load_bathymetry(Path::new("bathymetry_data")).unwrap();
//! ```

pub mod error;
pub mod loader;
pub mod workbook;
pub mod writer;

pub use error::LoadError;
pub use loader::{
    bathymetry_file_paths, build_loggers, load_bathymetry, load_fairway, load_logger_readings,
    load_loggers, parse_bathymetry_csv, parse_fairway_csv, parse_logger_points_csv,
    parse_logger_readings_csv, report_invalid_points, LoggerReadings,
};
pub use workbook::load_logger_workbook;
pub use writer::{write_soundings, write_soundings_to_path, SoundingRecord};

/// Field delimiter shared by every input and output file.
pub const DELIMITER: u8 = b';';
