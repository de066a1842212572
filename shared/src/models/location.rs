//! Store location: a `[lng, lat]` point plus a street address

use serde::{Deserialize, Serialize};

/// Mean Earth radius in meters (IUGG)
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Meters per degree of latitude on the mean sphere
const METERS_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// Geographic point in GeoJSON order: `[longitude, latitude]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint(pub f64, pub f64);

impl GeoPoint {
    pub fn new(lng: f64, lat: f64) -> Self {
        Self(lng, lat)
    }

    pub fn lng(&self) -> f64 {
        self.0
    }

    pub fn lat(&self) -> f64 {
        self.1
    }

    /// Both components finite and within WGS84 bounds
    pub fn is_valid(&self) -> bool {
        self.0.is_finite()
            && self.1.is_finite()
            && (-180.0..=180.0).contains(&self.0)
            && (-90.0..=90.0).contains(&self.1)
    }

    /// Great-circle distance in meters (haversine)
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        let (lat1, lat2) = (self.lat().to_radians(), other.lat().to_radians());
        let d_lat = lat2 - lat1;
        let d_lng = (other.lng() - self.lng()).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
    }

    /// Coarse box containing every point within `radius_m` of `self`.
    ///
    /// Longitude bounds are omitted when the box would wrap the antimeridian
    /// or reach a pole.
    pub fn bounding_box(&self, radius_m: f64) -> GeoBounds {
        let d_lat = radius_m / METERS_PER_DEGREE;
        let min_lat = (self.lat() - d_lat).max(-90.0);
        let max_lat = (self.lat() + d_lat).min(90.0);

        let lng = if min_lat <= -90.0 || max_lat >= 90.0 {
            None
        } else {
            // widest longitude span is at the latitude furthest from the equator
            let widest = min_lat.abs().max(max_lat.abs()).to_radians().cos();
            let d_lng = d_lat / widest;
            let (west, east) = (self.lng() - d_lng, self.lng() + d_lng);
            (west >= -180.0 && east <= 180.0).then_some((west, east))
        };

        GeoBounds {
            min_lat,
            max_lat,
            lng,
        }
    }
}

/// Latitude band plus optional longitude band
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    /// `(west, east)`; `None` means every longitude
    pub lng: Option<(f64, f64)>,
}

impl GeoBounds {
    pub fn contains(&self, point: &GeoPoint) -> bool {
        let lat_ok = (self.min_lat..=self.max_lat).contains(&point.lat());
        let lng_ok = self
            .lng
            .is_none_or(|(west, east)| (west..=east).contains(&point.lng()));
        lat_ok && lng_ok
    }
}

/// Embedded store location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub coordinates: GeoPoint,
    pub address: String,
}
