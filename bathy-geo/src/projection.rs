//! Geographic to planar coordinate conversion.
//!
//! Points arrive as WGS84 latitude/longitude and are projected once into
//! UTM easting/northing (meters), so that distances between soundings,
//! loggers and fairway references are plain Euclidean distances.

use crate::error::{GeoError, Result};
use crate::point::{GeoPoint, Located, Position};
use log::debug;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;

/// Scale factor at the central meridian.
pub const UTM_SCALE_FACTOR: f64 = 0.9996;

/// False easting in meters.
pub const UTM_FALSE_EASTING: f64 = 500_000.0;

/// False northing applied in the southern hemisphere.
pub const UTM_FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Latitude band letters from 80°S northwards, 8° each (X spans 12°).
const BAND_LETTERS: &[u8] = b"CDEFGHJKLMNPQRSTUVWXX";

/// WGS84 equatorial radius in meters
const A: f64 = 6_378_137.0;
/// WGS84 flattening
const F: f64 = 1.0 / 298.257_223_563;

/// A UTM grid zone: longitudinal zone number plus latitude band letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtmZone {
    pub number: u8,
    pub letter: char,
}

impl UtmZone {
    /// Zone containing the given coordinates, including the Norway and
    /// Svalbard exceptions to the regular 6° grid.
    pub fn for_coordinates(latitude: f64, longitude: f64) -> Result<Self> {
        check_coordinates(latitude, longitude)?;
        let letter = latitude_band(latitude)?;
        Ok(UtmZone {
            number: zone_number(latitude, longitude),
            letter,
        })
    }

    /// Longitude of the zone's central meridian in degrees.
    pub fn central_meridian(&self) -> f64 {
        (self.number as f64 - 1.0) * 6.0 - 180.0 + 3.0
    }

    pub fn is_northern(&self) -> bool {
        self.letter >= 'N'
    }
}

impl fmt::Display for UtmZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.letter)
    }
}

/// A projected coordinate pair in meters together with its zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanarPoint {
    /// Easting in meters
    pub x: f64,
    /// Northing in meters
    pub y: f64,
    pub zone: UtmZone,
}

impl PlanarPoint {
    pub fn new(x: f64, y: f64, zone: UtmZone) -> Self {
        PlanarPoint { x, y, zone }
    }

    /// Euclidean distance on the plane.
    pub fn distance_to(&self, other: &PlanarPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

fn check_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(GeoError::NonFiniteCoordinates {
            latitude,
            longitude,
        });
    }
    if !(-80.0..=84.0).contains(&latitude) {
        return Err(GeoError::LatitudeOutOfRange(latitude));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(GeoError::LongitudeOutOfRange(longitude));
    }
    Ok(())
}

fn latitude_band(latitude: f64) -> Result<char> {
    if !(-80.0..=84.0).contains(&latitude) {
        return Err(GeoError::LatitudeOutOfRange(latitude));
    }
    let index = (((latitude + 80.0) / 8.0).floor() as usize).min(BAND_LETTERS.len() - 1);
    Ok(BAND_LETTERS[index] as char)
}

fn zone_number(latitude: f64, longitude: f64) -> u8 {
    // southwest Norway
    if (56.0..64.0).contains(&latitude) && (3.0..12.0).contains(&longitude) {
        return 32;
    }
    // Svalbard
    if (72.0..=84.0).contains(&latitude) && longitude >= 0.0 {
        if longitude < 9.0 {
            return 31;
        } else if longitude < 21.0 {
            return 33;
        } else if longitude < 33.0 {
            return 35;
        } else if longitude < 42.0 {
            return 37;
        }
    }
    let number = ((longitude + 180.0) / 6.0).floor() as i64 + 1;
    number.clamp(1, 60) as u8
}

/// Transverse Mercator forward projection for the given zone.
fn project(latitude: f64, longitude: f64, zone: UtmZone) -> (f64, f64) {
    let lat_rad = latitude * PI / 180.0;
    let lon_rad = longitude * PI / 180.0;
    let lon0_rad = zone.central_meridian() * PI / 180.0;

    let e2 = 2.0 * F - F * F;
    let e_prime2 = e2 / (1.0 - e2);

    let n = A / (1.0 - e2 * lat_rad.sin().powi(2)).sqrt();
    let t = lat_rad.tan().powi(2);
    let c = e_prime2 * lat_rad.cos().powi(2);
    let a_coef = (lon_rad - lon0_rad) * lat_rad.cos();

    // Meridian arc length
    let e4 = e2 * e2;
    let e6 = e4 * e2;
    let m = A
        * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat_rad
            - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat_rad).sin()
            + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat_rad).sin()
            - (35.0 * e6 / 3072.0) * (6.0 * lat_rad).sin());

    let x = UTM_SCALE_FACTOR
        * n
        * (a_coef
            + (1.0 - t + c) * a_coef.powi(3) / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * e_prime2) * a_coef.powi(5) / 120.0)
        + UTM_FALSE_EASTING;

    let false_northing = if zone.is_northern() {
        0.0
    } else {
        UTM_FALSE_NORTHING_SOUTH
    };
    let y = UTM_SCALE_FACTOR
        * (m + n
            * lat_rad.tan()
            * (a_coef.powi(2) / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a_coef.powi(4) / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * e_prime2) * a_coef.powi(6)
                    / 720.0))
        + false_northing;

    (x, y)
}

/// Converts geographic points to UTM, once per point.
///
/// By default each point is projected in its own zone. A forced zone number
/// keeps a dataset that straddles a zone boundary in a single planar frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer {
    forced_zone: Option<u8>,
}

impl Normalizer {
    pub fn new() -> Self {
        Normalizer { forced_zone: None }
    }

    /// Project every point into the given zone number.
    pub fn with_zone(number: u8) -> Result<Self> {
        if !(1..=60).contains(&number) {
            return Err(GeoError::InvalidZone(number));
        }
        Ok(Normalizer {
            forced_zone: Some(number),
        })
    }

    pub fn forced_zone(&self) -> Option<u8> {
        self.forced_zone
    }

    /// Project a latitude/longitude pair.
    pub fn project(&self, latitude: f64, longitude: f64) -> Result<PlanarPoint> {
        let mut zone = UtmZone::for_coordinates(latitude, longitude)?;
        if let Some(number) = self.forced_zone {
            zone.number = number;
        }
        let (x, y) = project(latitude, longitude, zone);
        Ok(PlanarPoint { x, y, zone })
    }

    /// Normalize a single point in place.
    ///
    /// Returns `true` when the point was transformed. Planar and invalid
    /// points are left untouched, so a second pass is a no-op.
    pub fn normalize(&self, point: &mut GeoPoint) -> bool {
        let (latitude, longitude) = match point.position {
            Position::Geographic {
                latitude,
                longitude,
            } => (latitude, longitude),
            Position::Planar(_) | Position::Invalid => return false,
        };
        point.position = match self.project(latitude, longitude) {
            Ok(planar) => Position::Planar(planar),
            Err(e) => {
                debug!("Point from {} marked invalid: {}", point.source_display(), e);
                Position::Invalid
            }
        };
        true
    }

    /// Normalize a collection, returning how many points were transformed.
    pub fn normalize_all<P: Located>(&self, points: &mut [P]) -> usize {
        let mut transformed = 0;
        for point in points.iter_mut() {
            if self.normalize(point.geo_mut()) {
                transformed += 1;
            }
        }
        transformed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zone_for_coordinates() {
        let zone = UtmZone::for_coordinates(51.2, 7.5).unwrap();
        assert_eq!(zone, UtmZone { number: 32, letter: 'U' });
        assert_eq!(zone.to_string(), "32U");

        let southern = UtmZone::for_coordinates(-33.9, 151.2).unwrap();
        assert_eq!(southern.number, 56);
        assert_eq!(southern.letter, 'H');
        assert!(!southern.is_northern());
    }

    #[test]
    fn test_zone_exceptions() {
        // Bergen sits in 31V on the regular grid but belongs to 32V
        assert_eq!(UtmZone::for_coordinates(60.39, 5.32).unwrap().number, 32);
        assert_eq!(UtmZone::for_coordinates(78.2, 15.6).unwrap().number, 33);
        assert_eq!(UtmZone::for_coordinates(78.2, 15.6).unwrap().letter, 'X');
    }

    #[test]
    fn test_project_known_point() {
        // Reference values from the standard UTM tables
        let planar = Normalizer::new().project(51.2, 7.5).unwrap();
        assert_abs_diff_eq!(planar.x, 395_201.31, epsilon = 1.0);
        assert_abs_diff_eq!(planar.y, 5_673_135.24, epsilon = 1.0);
    }

    #[test]
    fn test_project_southern_hemisphere() {
        let planar = Normalizer::new().project(-33.8688, 151.2093).unwrap();
        assert_abs_diff_eq!(planar.x, 334_369.0, epsilon = 5.0);
        assert_abs_diff_eq!(planar.y, 6_250_948.0, epsilon = 5.0);
    }

    #[test]
    fn test_central_meridian_has_false_easting() {
        let planar = Normalizer::new().project(45.0, 9.0).unwrap();
        assert_abs_diff_eq!(planar.x, UTM_FALSE_EASTING, epsilon = 1e-6);
    }

    #[test]
    fn test_forced_zone() {
        let normalizer = Normalizer::with_zone(31).unwrap();
        let planar = normalizer.project(51.2, 7.5).unwrap();
        assert_eq!(planar.zone.number, 31);
        // East of the zone 31 central meridian
        assert!(planar.x > UTM_FALSE_EASTING);
        assert!(Normalizer::with_zone(0).is_err());
        assert!(Normalizer::with_zone(61).is_err());
    }

    #[test]
    fn test_invalid_coordinates() {
        let normalizer = Normalizer::new();
        assert!(matches!(
            normalizer.project(f64::NAN, 7.5),
            Err(GeoError::NonFiniteCoordinates { .. })
        ));
        assert_eq!(
            normalizer.project(85.0, 7.5),
            Err(GeoError::LatitudeOutOfRange(85.0))
        );
        assert_eq!(
            normalizer.project(45.0, 190.0),
            Err(GeoError::LongitudeOutOfRange(190.0))
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let normalizer = Normalizer::new();
        let mut point = GeoPoint::geographic(51.2, 7.5);
        assert!(normalizer.normalize(&mut point));
        let first = point.position.clone();
        assert!(!normalizer.normalize(&mut point));
        assert_eq!(point.position, first);
    }

    #[test]
    fn test_normalize_marks_invalid_permanently() {
        let normalizer = Normalizer::new();
        let mut point = GeoPoint::geographic(95.0, 7.5);
        assert!(normalizer.normalize(&mut point));
        assert_eq!(point.position, Position::Invalid);
        assert!(!normalizer.normalize(&mut point));
        assert_eq!(point.position, Position::Invalid);
    }

    #[test]
    fn test_normalize_all_counts_transformed_points() {
        let normalizer = Normalizer::new();
        let zone = UtmZone::for_coordinates(51.2, 7.5).unwrap();
        let mut points = vec![
            GeoPoint::geographic(51.2, 7.5),
            GeoPoint::planar(395201.31, 5673135.24, zone),
            GeoPoint::invalid(),
            GeoPoint::geographic(95.0, 7.5),
        ];
        assert_eq!(normalizer.normalize_all(&mut points), 2);
        assert!(points[0].planar_position().is_some());
        assert!(points[3].is_invalid());
        assert_eq!(normalizer.normalize_all(&mut points), 0);
    }
}
