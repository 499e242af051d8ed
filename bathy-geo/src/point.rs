use crate::projection::{PlanarPoint, UtmZone};
use std::path::{Path, PathBuf};

/// Where a point sits, in whichever frame it is currently expressed.
///
/// Coordinates are either both present or the point is `Invalid`; a point
/// never carries a single coordinate.
#[derive(Debug, Clone, PartialEq)]
pub enum Position {
    /// Raw WGS84 input, not yet normalized
    Geographic { latitude: f64, longitude: f64 },
    /// Projected UTM coordinates in meters
    Planar(PlanarPoint),
    /// Input coordinates were missing, unparsable or unprojectable
    Invalid,
}

/// Location shared by every point kind, plus the file it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub position: Position,
    pub source: Option<PathBuf>,
}

impl GeoPoint {
    pub fn geographic(latitude: f64, longitude: f64) -> Self {
        GeoPoint {
            position: Position::Geographic {
                latitude,
                longitude,
            },
            source: None,
        }
    }

    pub fn planar(x: f64, y: f64, zone: UtmZone) -> Self {
        GeoPoint {
            position: Position::Planar(PlanarPoint::new(x, y, zone)),
            source: None,
        }
    }

    pub fn invalid() -> Self {
        GeoPoint {
            position: Position::Invalid,
            source: None,
        }
    }

    /// Build from loader output: both coordinates or nothing.
    pub fn from_parsed(latitude: Option<f64>, longitude: Option<f64>) -> Self {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => GeoPoint::geographic(latitude, longitude),
            _ => GeoPoint::invalid(),
        }
    }

    pub fn with_source<P: AsRef<Path>>(mut self, source: P) -> Self {
        self.source = Some(source.as_ref().to_path_buf());
        self
    }

    /// Planar coordinates, if the point has been normalized successfully.
    pub fn planar_position(&self) -> Option<&PlanarPoint> {
        match &self.position {
            Position::Planar(planar) => Some(planar),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self.position, Position::Invalid)
    }

    pub fn source_display(&self) -> String {
        match &self.source {
            Some(path) => path.display().to_string(),
            None => String::from("<memory>"),
        }
    }
}

/// Anything that carries a `GeoPoint`.
pub trait Located {
    fn geo(&self) -> &GeoPoint;
    fn geo_mut(&mut self) -> &mut GeoPoint;

    fn planar_position(&self) -> Option<&PlanarPoint> {
        self.geo().planar_position()
    }
}

impl Located for GeoPoint {
    fn geo(&self) -> &GeoPoint {
        self
    }
    fn geo_mut(&mut self) -> &mut GeoPoint {
        self
    }
}
