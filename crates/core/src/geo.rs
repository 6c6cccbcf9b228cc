//! Geodesy helpers: coordinates, service areas and distance rounding.
//!
//! Distances are great-circle distances in metres on a spherical Earth.
//! Service areas are disks (centre + radius); a point exactly on the edge is
//! inside.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Mean Earth radius (IUGG), in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Default granularity for distances reported to clients, in metres.
pub const DEFAULT_DISTANCE_ROUNDING_M: f64 = 100.0;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Build a point, rejecting out-of-range or non-finite coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::Validation(format!(
                "Latitude {latitude} is out of range [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::Validation(format!(
                "Longitude {longitude} is out of range [-180, 180]"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Haversine distance to `other`, in metres.
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().min(1.0).asin();
        EARTH_RADIUS_M * c
    }
}

/// The disk around a provider's location within which they accept visits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServiceArea {
    pub center: GeoPoint,
    pub radius_m: f64,
}

impl ServiceArea {
    pub fn new(center: GeoPoint, radius_m: f64) -> Self {
        Self { center, radius_m }
    }

    /// Boundary-inclusive containment test.
    pub fn contains(&self, point: &GeoPoint) -> bool {
        self.center.distance_m(point) <= self.radius_m
    }
}

/// Validate a service radius supplied by a provider.
pub fn validate_radius(radius_m: f64) -> Result<(), CoreError> {
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(CoreError::Validation(
            "Service radius must be a positive number of metres".into(),
        ));
    }
    Ok(())
}

/// Round a distance to the nearest multiple of `step`.
///
/// A remainder of at least half a step rounds up, anything below rounds
/// down: with a step of 100, 149 becomes 100 and 150 becomes 200.
pub fn round_distance(distance: f64, step: f64) -> f64 {
    if step <= 0.0 || !distance.is_finite() {
        return distance;
    }
    let remainder = distance.rem_euclid(step);
    let floored = distance - remainder;
    if remainder >= step / 2.0 {
        floored + step
    } else {
        floored
    }
}
