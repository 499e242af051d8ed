//! Distance from the seashore, borrowed from the nearest fairway reference.
//!
//! Every query scans all references linearly. Fairway datasets are at most a
//! few thousand points, which keeps this well below the cost of loading them.

use crate::error::{EngineError, Result};
use bathy_geo::{FairwayReferencePoint, Located, PlanarPoint};
use log::debug;

/// Resolves `distance_from_shore` for arbitrary points.
#[derive(Debug, Clone)]
pub struct ShorelineResolver {
    references: Vec<(PlanarPoint, f64)>,
}

impl ShorelineResolver {
    /// Build from normalized fairway references. References with invalid
    /// coordinates are skipped; at least one valid reference is required.
    pub fn new(fairway: &[FairwayReferencePoint]) -> Result<Self> {
        if fairway.is_empty() {
            return Err(EngineError::NoFairwayPoints);
        }
        let references: Vec<(PlanarPoint, f64)> = fairway
            .iter()
            .filter_map(|f| f.planar_position().map(|p| (*p, f.distance_from_shore)))
            .collect();
        if references.is_empty() {
            return Err(EngineError::NoValidFairwayPoints(fairway.len()));
        }
        if references.len() < fairway.len() {
            debug!(
                "Shoreline resolver skipped {} fairway points without valid coordinates",
                fairway.len() - references.len()
            );
        }
        Ok(ShorelineResolver { references })
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Distance from shore of the fairway reference nearest to `point`.
    pub fn resolve(&self, point: &PlanarPoint) -> f64 {
        self.references
            .iter()
            .min_by(|(a, _), (b, _)| point.distance_to(a).total_cmp(&point.distance_to(b)))
            .map(|(_, distance)| *distance)
            // `new` guarantees at least one reference
            .unwrap_or_default()
    }

    /// Distance from shore for any located point. Points without planar
    /// coordinates get `None` and the resolver is not consulted.
    pub fn resolve_point<P: Located>(&self, point: &P) -> Option<f64> {
        point.planar_position().map(|p| self.resolve(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bathy_geo::{GeoPoint, UtmZone};

    const ZONE: UtmZone = UtmZone {
        number: 37,
        letter: 'T',
    };

    fn fairway() -> Vec<FairwayReferencePoint> {
        vec![
            FairwayReferencePoint::new(GeoPoint::planar(0.0, 0.0, ZONE), 0.0).unwrap(),
            FairwayReferencePoint::new(GeoPoint::planar(100.0, 0.0, ZONE), 100.0).unwrap(),
            FairwayReferencePoint::new(GeoPoint::planar(200.0, 0.0, ZONE), 200.0).unwrap(),
        ]
    }

    #[test]
    fn test_resolve_nearest_reference() {
        let resolver = ShorelineResolver::new(&fairway()).unwrap();
        assert_eq!(resolver.resolve(&PlanarPoint::new(90.0, 40.0, ZONE)), 100.0);
        assert_eq!(resolver.resolve(&PlanarPoint::new(-500.0, 0.0, ZONE)), 0.0);
        assert_eq!(resolver.resolve(&PlanarPoint::new(180.0, -3.0, ZONE)), 200.0);
    }

    #[test]
    fn test_invalid_point_is_not_resolved() {
        let resolver = ShorelineResolver::new(&fairway()).unwrap();
        assert_eq!(resolver.resolve_point(&GeoPoint::invalid()), None);
        // Not yet normalized
        assert_eq!(resolver.resolve_point(&GeoPoint::geographic(47.0, 39.0)), None);
        assert_eq!(
            resolver.resolve_point(&GeoPoint::planar(101.0, 1.0, ZONE)),
            Some(100.0)
        );
    }

    #[test]
    fn test_empty_or_invalid_fairway_is_fatal() {
        assert_eq!(
            ShorelineResolver::new(&[]).unwrap_err(),
            EngineError::NoFairwayPoints
        );
        let invalid = vec![FairwayReferencePoint::new(GeoPoint::invalid(), 10.0).unwrap()];
        assert_eq!(
            ShorelineResolver::new(&invalid).unwrap_err(),
            EngineError::NoValidFairwayPoints(1)
        );
    }

    #[test]
    fn test_invalid_references_are_skipped() {
        let mut references = fairway();
        references.push(FairwayReferencePoint::new(GeoPoint::invalid(), 999.0).unwrap());
        let resolver = ShorelineResolver::new(&references).unwrap();
        assert_eq!(resolver.len(), 3);
    }
}
