//! Catalog Query Service
//!
//! Read-only discovery over persisted stores. Every read ends with
//! [`CatalogService::attach_reviews`], so callers always get stores with
//! their reviews populated.

use std::collections::HashMap;

use shared::models::GeoPoint;

use crate::core::Config;
use crate::db::models::{NearbyStore, Review, Store, StorePage, StoreWithReviews};
use crate::db::repository::{ReviewRepository, StoreRepository, parse_record_id};
use crate::utils::{AppError, AppResult};

/// Largest page size accepted by [`CatalogService::list_page`]
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Clone)]
pub struct CatalogService {
    stores: StoreRepository,
    reviews: ReviewRepository,
    near_default_limit: usize,
    near_max_distance_m: Option<f64>,
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService")
            .field("near_default_limit", &self.near_default_limit)
            .field("near_max_distance_m", &self.near_max_distance_m)
            .finish()
    }
}

impl CatalogService {
    pub fn new(stores: StoreRepository, reviews: ReviewRepository, config: &Config) -> Self {
        Self {
            stores,
            reviews,
            near_default_limit: config.near_default_limit,
            near_max_distance_m: config.near_max_distance_m,
        }
    }

    /// Populate `reviews` on each store, keeping the input order
    pub async fn attach_reviews(&self, stores: Vec<Store>) -> AppResult<Vec<StoreWithReviews>> {
        let ids = stores.iter().map(|s| s.id.clone()).collect();
        let reviews = self.reviews.find_by_stores(ids).await?;

        let mut by_store: HashMap<String, Vec<Review>> = HashMap::new();
        for review in reviews {
            by_store.entry(review.store.to_string()).or_default().push(review);
        }

        Ok(stores
            .into_iter()
            .map(|store| {
                let reviews = by_store.remove(&store.id.to_string()).unwrap_or_default();
                StoreWithReviews { store, reviews }
            })
            .collect())
    }

    async fn attach_one(&self, store: Option<Store>) -> AppResult<Option<StoreWithReviews>> {
        match store {
            Some(store) => Ok(self.attach_reviews(vec![store]).await?.pop()),
            None => Ok(None),
        }
    }

    /// Exact slug lookup; an unknown slug is `Ok(None)`
    pub async fn find_by_slug(&self, slug: &str) -> AppResult<Option<StoreWithReviews>> {
        let store = self.stores.find_by_slug(slug).await?;
        self.attach_one(store).await
    }

    /// Lookup by `store:key` or bare key; an unknown id is `Ok(None)`
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<StoreWithReviews>> {
        let id = parse_record_id("store", id)?;
        let store = self.stores.find_by_id(&id).await?;
        self.attach_one(store).await
    }

    /// Stores nearest to `point`, closest first.
    ///
    /// `radius_m` (or the configured default distance) bounds the search;
    /// at most `near_default_limit` stores are returned.
    pub async fn find_near(
        &self,
        point: GeoPoint,
        radius_m: Option<f64>,
    ) -> AppResult<Vec<NearbyStore>> {
        if !point.is_valid() {
            return Err(AppError::validation(format!(
                "Invalid coordinates: [{}, {}]",
                point.lng(),
                point.lat()
            )));
        }

        let radius = radius_m.or(self.near_max_distance_m);
        if let Some(r) = radius
            && !(r.is_finite() && r >= 0.0)
        {
            return Err(AppError::validation(format!("Invalid radius: {}", r)));
        }

        let candidates = match radius {
            Some(r) => self.stores.find_in_bounds(&point.bounding_box(r)).await?,
            None => self.stores.find_all().await?,
        };

        let mut hits: Vec<(f64, Store)> = candidates
            .into_iter()
            .map(|store| (point.distance_to(&store.location.coordinates), store))
            .filter(|(distance, _)| radius.is_none_or(|r| *distance <= r))
            .collect();

        hits.sort_by(|(da, a), (db, b)| {
            da.total_cmp(db)
                .then_with(|| a.id.to_string().cmp(&b.id.to_string()))
        });
        hits.truncate(self.near_default_limit);

        let (distances, stores): (Vec<f64>, Vec<Store>) = hits.into_iter().unzip();
        let stores = self.attach_reviews(stores).await?;

        tracing::debug!(
            lng = point.lng(),
            lat = point.lat(),
            radius_m = ?radius,
            hits = stores.len(),
            "Nearby lookup"
        );

        Ok(stores
            .into_iter()
            .zip(distances)
            .map(|(store, distance_m)| NearbyStore { store, distance_m })
            .collect())
    }

    /// Full-text search over name and description, most relevant first.
    ///
    /// Blank text matches nothing.
    pub async fn search(&self, text: &str) -> AppResult<Vec<StoreWithReviews>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Vec::new());
        }
        let stores = self.stores.search(text).await?;
        self.attach_reviews(stores).await
    }

    /// Every store, oldest first
    pub async fn list_all(&self) -> AppResult<Vec<StoreWithReviews>> {
        let stores = self.stores.find_all().await?;
        self.attach_reviews(stores).await
    }

    /// One page of stores, newest first. `page` is 1-indexed; `per_page` is
    /// clamped to `1..=MAX_PER_PAGE`.
    pub async fn list_page(&self, page: u32, per_page: u32) -> AppResult<StorePage> {
        let page = page.max(1);
        let per_page = per_page.clamp(1, MAX_PER_PAGE);
        let start = u64::from(page - 1) * u64::from(per_page);

        let total = self.stores.count().await?;
        let stores = self.stores.find_page(start, u64::from(per_page)).await?;
        let items = self.attach_reviews(stores).await?;
        let pages = total.div_ceil(u64::from(per_page)) as u32;

        Ok(StorePage {
            items,
            page,
            per_page,
            total,
            pages,
        })
    }

    /// Stores carrying `tag`; with no tag, every store that has any tag
    pub async fn find_by_tag(&self, tag: Option<&str>) -> AppResult<Vec<StoreWithReviews>> {
        let tag = tag.map(str::trim).filter(|t| !t.is_empty());
        let stores = self.stores.find_by_tag(tag).await?;
        self.attach_reviews(stores).await
    }
}
