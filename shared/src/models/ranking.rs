//! Aggregation result rows

use serde::{Deserialize, Serialize};

/// One row of the tag popularity list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

/// Per-store review statistics, keyed by whatever identifies the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary<K> {
    pub store: K,
    pub review_count: u64,
    pub average_rating: f64,
}
