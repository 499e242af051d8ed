/// Error types for loading and writing survey files
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for bathy-io operations
#[derive(Error, Debug)]
pub enum LoadError {
    /// Input file or directory does not exist
    #[error("Can not find {}", .0.display())]
    NotFound(PathBuf),

    /// File exists but could not be read or written
    #[error("Can not access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row does not match the expected layout
    #[error("The wrong format of data in {} (line {line}): {reason}", .path.display())]
    Format {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    /// Spreadsheet could not be opened or a sheet could not be read
    #[error("Can not read workbook {}: {source}", .path.display())]
    Workbook {
        path: PathBuf,
        #[source]
        source: calamine::Error,
    },

    /// Failed to read or write CSV
    #[error("Failed to process CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl LoadError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound(path.to_path_buf())
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Type alias for Results using LoadError
pub type Result<T> = std::result::Result<T, LoadError>;
