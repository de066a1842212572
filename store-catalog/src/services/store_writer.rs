//! Store Write Service
//!
//! Create and update run the same pipeline:
//! validate → ingest photo → assign slug → persist.
//!
//! The photo blob is written before the store row. Once a blob exists, any
//! failure of the row write is reported as `StorageInconsistency` carrying
//! the orphaned key; nothing is rolled back.

use shared::slug::slugify;
use shared::util::now_millis;
use validator::Validate;

use crate::db::models::store::description_change;
use crate::db::models::{Store, StoreChanges, StoreInput, StoreRecord, StoreUpdate, StoreWithReviews};
use crate::db::repository::{StoreRepository, parse_record_id};
use crate::imaging::{PhotoIngestor, PhotoUpload};
use crate::services::{CatalogService, SlugAssigner};
use crate::utils::{AppError, AppResult, ErrorCode, from_validation_errors};

#[derive(Clone)]
pub struct StoreWriter {
    stores: StoreRepository,
    catalog: CatalogService,
    slugs: SlugAssigner,
    photos: PhotoIngestor,
}

impl StoreWriter {
    pub fn new(
        stores: StoreRepository,
        catalog: CatalogService,
        slugs: SlugAssigner,
        photos: PhotoIngestor,
    ) -> Self {
        Self {
            stores,
            catalog,
            slugs,
            photos,
        }
    }

    /// Create a store owned by `input.author`
    pub async fn create(
        &self,
        input: StoreInput,
        photo: Option<PhotoUpload>,
    ) -> AppResult<StoreWithReviews> {
        let input = input.normalize();
        input.validate().map_err(from_validation_errors)?;
        SlugAssigner::base_for(&input.name)?;

        let photo_key = self.photos.ingest(photo).await?.map(|p| p.key);

        let template = StoreRecord {
            name: input.name.clone(),
            slug: String::new(),
            description: input.description.clone(),
            location: input.location(),
            photo: photo_key.clone(),
            tags: input.tags.clone(),
            author: input.author.clone(),
            created: now_millis(),
        };

        let result = self
            .slugs
            .assign(&input.name, None, |slug| {
                let repo = self.stores.clone();
                let record = StoreRecord {
                    slug,
                    ..template.clone()
                };
                async move { repo.create(record).await }
            })
            .await;

        let store = after_blob_write(result, photo_key.as_deref())?;
        tracing::info!(id = %store.id, slug = %store.slug, "Store created");

        Ok(StoreWithReviews {
            store,
            reviews: Vec::new(),
        })
    }

    /// Apply `changes` to the store `id` on behalf of `editor`.
    ///
    /// Only the author may edit. The slug is reassigned only when the name
    /// changes its normalized form.
    pub async fn update(
        &self,
        id: &str,
        editor: &str,
        changes: StoreUpdate,
        photo: Option<PhotoUpload>,
    ) -> AppResult<StoreWithReviews> {
        let id = parse_record_id("store", id)?;
        let existing = self
            .stores
            .find_by_id(&id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound).with_detail("id", id.to_string()))?;

        confirm_owner(&existing, editor)?;

        let changes = changes.normalize();
        changes.validate().map_err(from_validation_errors)?;
        let location = changes.location().map_err(|field| {
            AppError::required(field, "Address, longitude and latitude must be changed together")
        })?;

        let rename = match &changes.name {
            Some(name) => {
                let base = SlugAssigner::base_for(name)?;
                (base != slugify(&existing.name)).then(|| name.clone())
            }
            None => None,
        };

        let photo_key = self.photos.ingest(photo).await?.map(|p| p.key);

        let merge = StoreChanges {
            name: changes.name.clone(),
            slug: None,
            description: description_change(&changes),
            location,
            photo: photo_key.clone(),
            tags: changes.tags.clone(),
        };

        let result = match rename {
            Some(name) => {
                self.slugs
                    .assign(&name, Some(&id), |slug| {
                        let repo = self.stores.clone();
                        let id = id.clone();
                        let merge = StoreChanges {
                            slug: Some(slug),
                            ..merge.clone()
                        };
                        async move { repo.update(&id, merge).await }
                    })
                    .await
            }
            None => self.stores.update(&id, merge).await.map_err(AppError::from),
        };

        let store = after_blob_write(result, photo_key.as_deref())?;
        tracing::info!(id = %store.id, slug = %store.slug, "Store updated");

        self.catalog
            .attach_reviews(vec![store])
            .await?
            .pop()
            .ok_or_else(|| AppError::new(ErrorCode::StoreNotFound).with_detail("id", id.to_string()))
    }
}

fn confirm_owner(store: &Store, editor: &str) -> AppResult<()> {
    if store.author != editor.trim() {
        tracing::warn!(id = %store.id, editor, "Edit rejected, not the store author");
        return Err(AppError::new(ErrorCode::NotStoreOwner).with_detail("id", store.id.to_string()));
    }
    Ok(())
}

/// Wrap a row-write failure that happened after `blob` was stored
fn after_blob_write(result: AppResult<Store>, blob: Option<&str>) -> AppResult<Store> {
    match (result, blob) {
        (Ok(store), _) => Ok(store),
        (Err(err), None) => Err(err),
        (Err(err), Some(key)) => {
            tracing::warn!(orphaned_blob = key, code = %err.code, error = %err, "Store write failed after photo upload");
            Err(AppError::storage_inconsistency(format!(
                "Photo saved but the store could not be written: {}",
                err.message
            ))
            .with_detail("orphaned_blob", key)
            .with_detail("cause", err.code.code()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::RecordId;

    #[test]
    fn test_after_blob_write_marks_orphans() {
        let err = after_blob_write(Err(AppError::database("disk full")), Some("a.png")).unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageInconsistency);
        let details = err.details.unwrap();
        assert_eq!(details.get("orphaned_blob").unwrap(), "a.png");
        assert_eq!(details.get("cause").unwrap(), ErrorCode::DatabaseError.code());
    }

    #[test]
    fn test_after_blob_write_passes_through_without_blob() {
        let err = after_blob_write(Err(AppError::database("disk full")), None).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn test_confirm_owner() {
        let store = Store {
            id: RecordId::from_table_key("store", "a"),
            name: "Blue Door".into(),
            slug: "blue-door".into(),
            description: None,
            location: shared::models::Location {
                coordinates: shared::models::GeoPoint::new(0.0, 0.0),
                address: "1 Main St".into(),
            },
            photo: None,
            tags: Vec::new(),
            author: "user:1".into(),
            created: 0,
        };
        assert!(confirm_owner(&store, "user:1").is_ok());
        let err = confirm_owner(&store, "user:2").unwrap_err();
        assert_eq!(err.code, ErrorCode::NotStoreOwner);
    }
}
