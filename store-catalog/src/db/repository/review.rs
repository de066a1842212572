//! Review Repository
//!
//! Read side of the external review feed.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::serde_helpers;
use crate::db::models::{Review, ReviewCreate};
use serde::Deserialize;
use shared::models::RatingSummary;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "review";

/// Per-store aggregate row
#[derive(Debug, Deserialize)]
struct RatingRow {
    #[serde(with = "serde_helpers::record_id")]
    store: RecordId,
    review_count: u64,
    average_rating: f64,
}

#[derive(Clone)]
pub struct ReviewRepository {
    base: BaseRepository,
}

impl ReviewRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Reviews of the given stores, oldest first
    pub async fn find_by_stores(&self, stores: Vec<RecordId>) -> RepoResult<Vec<Review>> {
        if stores.is_empty() {
            return Ok(Vec::new());
        }
        let reviews: Vec<Review> = self
            .base
            .db()
            .query("SELECT * FROM review WHERE store IN $stores ORDER BY created ASC")
            .bind(("stores", stores))
            .await?
            .take(0)?;
        Ok(reviews)
    }

    /// Review count and mean rating per store, grouped in the database.
    ///
    /// Reviews whose store no longer exists are left out. Keys are `"store:key"` strings so they order deterministically.
    pub async fn rating_summaries(&self) -> RepoResult<Vec<RatingSummary<String>>> {
        let rows: Vec<RatingRow> = self
            .base
            .db()
            .query(
                "SELECT store, count() AS review_count, math::mean(rating) AS average_rating \
                 FROM review WHERE store.id != NONE GROUP BY store",
            )
            .await?
            .take(0)?;

        Ok(rows
            .into_iter()
            .map(|row| RatingSummary {
                store: row.store.to_string(),
                review_count: row.review_count,
                average_rating: row.average_rating,
            })
            .collect())
    }

    pub async fn create(&self, data: ReviewCreate) -> RepoResult<Review> {
        let created: Option<Review> = self.base.db().create(TABLE).content(data).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create review".to_string()))
    }
}
