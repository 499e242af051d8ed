/// Error types for point construction and coordinate normalization
use thiserror::Error;

/// Main error type for bathy-geo operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// Latitude or longitude is NaN or infinite
    #[error("Coordinates are not finite: latitude {latitude}, longitude {longitude}")]
    NonFiniteCoordinates { latitude: f64, longitude: f64 },

    /// Latitude outside the UTM band range (80°S to 84°N)
    #[error("Latitude out of UTM range (-80..=84): {0}")]
    LatitudeOutOfRange(f64),

    /// Longitude outside -180..=180
    #[error("Longitude out of range (-180..=180): {0}")]
    LongitudeOutOfRange(f64),

    /// UTM zone number outside 1..=60
    #[error("UTM zone must be 1-60, got {0}")]
    InvalidZone(u8),

    /// Fairway distance from shore must be a finite, non-negative number
    #[error("Invalid distance from shore: {0}")]
    InvalidDistance(f64),
}

/// Type alias for Results using GeoError
pub type Result<T> = std::result::Result<T, GeoError>;
