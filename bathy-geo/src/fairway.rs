use crate::error::{GeoError, Result};
use crate::point::{GeoPoint, Located};

/// A sample point along the fairway with an authoritative distance from the
/// seashore, in meters along the channel.
#[derive(Debug, Clone, PartialEq)]
pub struct FairwayReferencePoint {
    pub point: GeoPoint,
    pub distance_from_shore: f64,
}

impl FairwayReferencePoint {
    pub fn new(point: GeoPoint, distance_from_shore: f64) -> Result<Self> {
        if !distance_from_shore.is_finite() || distance_from_shore < 0.0 {
            return Err(GeoError::InvalidDistance(distance_from_shore));
        }
        Ok(FairwayReferencePoint {
            point,
            distance_from_shore,
        })
    }
}

impl Located for FairwayReferencePoint {
    fn geo(&self) -> &GeoPoint {
        &self.point
    }
    fn geo_mut(&mut self) -> &mut GeoPoint {
        &mut self.point
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative_or_nan_distance() {
        assert_eq!(
            FairwayReferencePoint::new(GeoPoint::invalid(), -1.0),
            Err(GeoError::InvalidDistance(-1.0))
        );
        assert!(FairwayReferencePoint::new(GeoPoint::invalid(), f64::NAN).is_err());
        assert!(FairwayReferencePoint::new(GeoPoint::invalid(), 0.0).is_ok());
    }
}
