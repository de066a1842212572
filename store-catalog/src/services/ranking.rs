//! Ranking Aggregation
//!
//! - tag popularity: unwind every store's tags, count per tag
//! - top stores: per-store review count and mean (grouped in the database),
//!   then the review floor, ordering and limit

use std::collections::HashMap;

use shared::models::TagCount;
use shared::ranking::{rank_by_rating, tag_frequency};

use crate::db::models::RankedStore;
use crate::db::repository::{ReviewRepository, StoreRepository, parse_record_id};
use crate::services::CatalogService;
use crate::utils::AppResult;

#[derive(Clone)]
pub struct RankingService {
    stores: StoreRepository,
    reviews: ReviewRepository,
    catalog: CatalogService,
    default_limit: usize,
}

impl RankingService {
    pub fn new(
        stores: StoreRepository,
        reviews: ReviewRepository,
        catalog: CatalogService,
        default_limit: usize,
    ) -> Self {
        Self {
            stores,
            reviews,
            catalog,
            default_limit,
        }
    }

    /// Occurrences per tag, most frequent first (ties by tag)
    pub async fn tag_frequency(&self) -> AppResult<Vec<TagCount>> {
        let tags = self.stores.all_tags().await?;
        Ok(tag_frequency(tags.iter().flatten()))
    }

    /// Top stores using the configured default limit
    pub async fn top_stores_default(&self) -> AppResult<Vec<RankedStore>> {
        self.top_stores(self.default_limit).await
    }

    /// Stores with at least two reviews, best average first.
    ///
    /// Ties break on review count (more first) and then store id.
    pub async fn top_stores(&self, limit: usize) -> AppResult<Vec<RankedStore>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let summaries = self.reviews.rating_summaries().await?;
        let ranked = rank_by_rating(summaries, limit);

        let ids = ranked
            .iter()
            .map(|s| parse_record_id("store", &s.store))
            .collect::<Result<Vec<_>, _>>()?;
        let stores = self.stores.find_by_ids(ids).await?;
        let mut by_id: HashMap<String, _> = self
            .catalog
            .attach_reviews(stores)
            .await?
            .into_iter()
            .map(|s| (s.store.id.to_string(), s))
            .collect();

        // Stores deleted between the two reads drop out here
        Ok(ranked
            .into_iter()
            .filter_map(|summary| {
                by_id.remove(&summary.store).map(|store| RankedStore {
                    store,
                    average_rating: summary.average_rating,
                    review_count: summary.review_count,
                })
            })
            .collect())
    }
}
