//! Review Model
//!
//! Reviews come from an external feed; the catalog only reads them (the
//! `ReviewCreate` payload exists for seeding).

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(with = "serde_helpers::record_id")]
    pub id: RecordId,
    #[serde(with = "serde_helpers::record_id")]
    pub store: RecordId,
    /// 1-5, not necessarily whole
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
}

/// Review for creation (without id)
#[derive(Debug, Clone, Serialize)]
pub struct ReviewCreate {
    pub store: RecordId,
    pub rating: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub created: i64,
}
