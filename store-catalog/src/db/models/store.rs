//! Store Model

use super::review::Review;
use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::models::{GeoPoint, Location};
use surrealdb::RecordId;
use validator::Validate;

/// Persisted store row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    pub name: String,
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub author: String,
    /// Unix millis
    pub created: i64,
}

/// Row content written on insert (the database assigns the id)
#[derive(Debug, Clone, Serialize)]
pub struct StoreRecord {
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub tags: Vec<String>,
    pub author: String,
    pub created: i64,
}

/// Partial update merged into an existing row
///
/// `description: Some(None)` removes the description.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl StoreChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.slug.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.photo.is_none()
            && self.tags.is_none()
    }
}

// =============================================================================
// Write inputs
// =============================================================================

/// Input for creating a store
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StoreInput {
    #[validate(length(min = 1, message = "Please enter a store name!"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "You must supply an address!"))]
    pub address: String,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lng: f64,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(length(min = 1, message = "You must supply an author"))]
    pub author: String,
}

impl StoreInput {
    /// Trim text fields, drop blank tags and turn a blank description into none
    pub fn normalize(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.address = self.address.trim().to_string();
        self.author = self.author.trim().to_string();
        self.description = normalize_description(self.description);
        self.tags = normalize_tags(self.tags);
        self
    }

    pub fn location(&self) -> Location {
        Location {
            coordinates: GeoPoint::new(self.lng, self.lat),
            address: self.address.clone(),
        }
    }
}

/// Input for updating a store; absent fields stay untouched
///
/// Coordinates and address travel together: a location change needs all
/// three.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StoreUpdate {
    #[validate(length(min = 1, message = "Please enter a store name!"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "You must supply an address!"))]
    pub address: Option<String>,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub lng: Option<f64>,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub lat: Option<f64>,
    pub tags: Option<Vec<String>>,
}

impl StoreUpdate {
    pub fn normalize(mut self) -> Self {
        self.name = self.name.map(|n| n.trim().to_string());
        self.address = self.address.map(|a| a.trim().to_string());
        self.tags = self.tags.map(normalize_tags);
        self
    }

    /// The new location, if any part of it was supplied
    ///
    /// Returns `Err` with the missing field name when the location is only
    /// partially given.
    pub fn location(&self) -> Result<Option<Location>, &'static str> {
        match (&self.address, self.lng, self.lat) {
            (None, None, None) => Ok(None),
            (Some(address), Some(lng), Some(lat)) => Ok(Some(Location {
                coordinates: GeoPoint::new(lng, lat),
                address: address.clone(),
            })),
            (None, _, _) => Err("address"),
            (_, None, _) => Err("lng"),
            (_, _, None) => Err("lat"),
        }
    }
}

fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Description change carried by an update: `None` = untouched,
/// `Some(None)` = cleared
pub fn description_change(update: &StoreUpdate) -> Option<Option<String>> {
    update
        .description
        .as_ref()
        .map(|d| normalize_description(Some(d.clone())))
}

// =============================================================================
// Read models
// =============================================================================

/// A store with its reviews attached
#[derive(Debug, Clone, Serialize)]
pub struct StoreWithReviews {
    #[serde(flatten)]
    pub store: Store,
    pub reviews: Vec<Review>,
}

/// A nearby hit with its great-circle distance from the query point
#[derive(Debug, Clone, Serialize)]
pub struct NearbyStore {
    #[serde(flatten)]
    pub store: StoreWithReviews,
    pub distance_m: f64,
}

/// A top-stores entry
#[derive(Debug, Clone, Serialize)]
pub struct RankedStore {
    #[serde(flatten)]
    pub store: StoreWithReviews,
    pub average_rating: f64,
    pub review_count: u64,
}

/// One page of stores, newest first
#[derive(Debug, Clone, Serialize)]
pub struct StorePage {
    pub items: Vec<StoreWithReviews>,
    /// 1-indexed
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub pages: u32,
}
