//! Storage-independent catalog models

pub mod location;
pub mod ranking;

pub use location::{EARTH_RADIUS_M, GeoBounds, GeoPoint, Location};
pub use ranking::{RatingSummary, TagCount};
