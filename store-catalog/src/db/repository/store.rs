//! Store Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Store, StoreChanges, StoreRecord};
use serde::Deserialize;
use shared::models::GeoBounds;
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "store";

#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

#[derive(Clone)]
pub struct StoreRepository {
    base: BaseRepository,
}

impl StoreRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All stores, oldest first
    pub async fn find_all(&self) -> RepoResult<Vec<Store>> {
        let stores: Vec<Store> = self
            .base
            .db()
            .query("SELECT * FROM store ORDER BY created ASC")
            .await?
            .take(0)?;
        Ok(stores)
    }

    pub async fn find_by_id(&self, id: &RecordId) -> RepoResult<Option<Store>> {
        let store: Option<Store> = self.base.db().select(id.clone()).await?;
        Ok(store)
    }

    pub async fn find_by_ids(&self, ids: Vec<RecordId>) -> RepoResult<Vec<Store>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let stores: Vec<Store> = self
            .base
            .db()
            .query("SELECT * FROM store WHERE id IN $ids")
            .bind(("ids", ids))
            .await?
            .take(0)?;
        Ok(stores)
    }

    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Store>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM store WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug.to_string()))
            .await?;
        let stores: Vec<Store> = result.take(0)?;
        Ok(stores.into_iter().next())
    }

    /// Slugs equal to `base` or starting with `base-`, case-insensitively,
    /// optionally ignoring one store.
    ///
    /// This is a superset of the suffix family; callers narrow it with the
    /// exact pattern.
    pub async fn slugs_like(&self, base: &str, exclude: Option<&RecordId>) -> RepoResult<Vec<String>> {
        let base = base.to_lowercase();
        let prefix = format!("{}-", base);

        let mut query = String::from(
            "SELECT VALUE slug FROM store \
             WHERE (string::lowercase(slug) = $base OR string::starts_with(string::lowercase(slug), $prefix))",
        );
        if exclude.is_some() {
            query.push_str(" AND id != $exclude");
        }

        let slugs: Vec<String> = self
            .base
            .db()
            .query(query)
            .bind(("base", base))
            .bind(("prefix", prefix))
            .bind(("exclude", exclude.cloned()))
            .await?
            .take(0)?;
        Ok(slugs)
    }

    /// Stores whose coordinates fall inside `bounds`
    pub async fn find_in_bounds(&self, bounds: &GeoBounds) -> RepoResult<Vec<Store>> {
        let mut query = String::from(
            "SELECT * FROM store \
             WHERE location.coordinates[1] >= $min_lat AND location.coordinates[1] <= $max_lat",
        );
        let (west, east) = match bounds.lng {
            Some((west, east)) => {
                query.push_str(
                    " AND location.coordinates[0] >= $west AND location.coordinates[0] <= $east",
                );
                (west, east)
            }
            None => (-180.0, 180.0),
        };

        let stores: Vec<Store> = self
            .base
            .db()
            .query(query)
            .bind(("min_lat", bounds.min_lat))
            .bind(("max_lat", bounds.max_lat))
            .bind(("west", west))
            .bind(("east", east))
            .await?
            .take(0)?;
        Ok(stores)
    }

    /// Full-text match on name or description, best score first
    pub async fn search(&self, text: &str) -> RepoResult<Vec<Store>> {
        let stores: Vec<Store> = self
            .base
            .db()
            .query(
                "SELECT *, (search::score(1) OR 0) + (search::score(2) OR 0) AS score FROM store \
                 WHERE name @1@ $text OR description @2@ $text \
                 ORDER BY score DESC",
            )
            .bind(("text", text.to_string()))
            .await?
            .take(0)?;
        Ok(stores)
    }

    /// Stores carrying `tag`, or every tagged store when `tag` is `None`
    pub async fn find_by_tag(&self, tag: Option<&str>) -> RepoResult<Vec<Store>> {
        let db = self.base.db();
        let mut result = match tag {
            Some(tag) => {
                db.query("SELECT * FROM store WHERE tags CONTAINS $tag ORDER BY created ASC")
                    .bind(("tag", tag.to_string()))
                    .await?
            }
            None => {
                db.query("SELECT * FROM store WHERE array::len(tags) > 0 ORDER BY created ASC")
                    .await?
            }
        };
        let stores: Vec<Store> = result.take(0)?;
        Ok(stores)
    }

    /// Tag list of every store, one entry per store
    pub async fn all_tags(&self) -> RepoResult<Vec<Vec<String>>> {
        let tags: Vec<Option<Vec<String>>> = self
            .base
            .db()
            .query("SELECT VALUE tags FROM store")
            .await?
            .take(0)?;
        Ok(tags.into_iter().flatten().collect())
    }

    /// One page, newest first
    pub async fn find_page(&self, start: u64, limit: u64) -> RepoResult<Vec<Store>> {
        let stores: Vec<Store> = self
            .base
            .db()
            .query("SELECT * FROM store ORDER BY created DESC LIMIT $limit START $start")
            .bind(("limit", limit))
            .bind(("start", start))
            .await?
            .take(0)?;
        Ok(stores)
    }

    pub async fn count(&self) -> RepoResult<u64> {
        let rows: Vec<CountRow> = self
            .base
            .db()
            .query("SELECT count() AS count FROM store GROUP ALL")
            .await?
            .take(0)?;
        Ok(rows.first().map(|r| r.count).unwrap_or(0))
    }

    /// Insert a new store
    ///
    /// A slug that already exists fails with [`RepoError::Duplicate`].
    pub async fn create(&self, record: StoreRecord) -> RepoResult<Store> {
        let created: Option<Store> = self
            .base
            .db()
            .create(TABLE)
            .content(record)
            .await
            .map_err(RepoError::from)?;
        created.ok_or_else(|| RepoError::Database("Failed to create store".to_string()))
    }

    /// Merge `changes` into an existing store
    pub async fn update(&self, id: &RecordId, changes: StoreChanges) -> RepoResult<Store> {
        if !changes.is_empty() {
            // MERGE writes a cleared description as null; the UNSET runs in
            // the same transaction so the edit lands whole or not at all
            let query = if matches!(changes.description, Some(None)) {
                "BEGIN TRANSACTION; \
                 UPDATE $thing MERGE $data; \
                 UPDATE $thing UNSET description; \
                 COMMIT TRANSACTION;"
            } else {
                "UPDATE $thing MERGE $data"
            };

            self.base
                .db()
                .query(query)
                .bind(("thing", id.clone()))
                .bind(("data", changes))
                .await?
                .check()?;
        }

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Store {} not found", id)))
    }
}
