//! Point types for bottom elevation surveys.
//!
//! Soundings, fairway references and water level loggers all share a
//! [`GeoPoint`] that starts out geographic and is projected to UTM exactly
//! once by the [`Normalizer`].

pub mod error;
pub mod fairway;
pub mod logger;
pub mod point;
pub mod projection;
pub mod sounding;

pub use error::GeoError;
pub use fairway::FairwayReferencePoint;
pub use logger::{LoggerPoint, Reading, Straddle, WaterLevelSeries};
pub use point::{GeoPoint, Located, Position};
pub use projection::{Normalizer, PlanarPoint, UtmZone};
pub use sounding::{BracketPosition, SoundingFailure, SoundingPoint};
