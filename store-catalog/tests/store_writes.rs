mod common;

use std::sync::Arc;

use async_trait::async_trait;
use common::{catalog, catalog_with, input, png};
use store_catalog::db::models::{StoreChanges, StoreUpdate};
use store_catalog::{AppError, BlobStore, CatalogState, Config, ErrorCode, PhotoUpload};

fn upload(content_type: &str, bytes: Vec<u8>) -> Option<PhotoUpload> {
    Some(PhotoUpload {
        content_type: content_type.to_string(),
        bytes,
        file_name: Some("photo".into()),
    })
}

#[tokio::test]
async fn create_with_photo_stores_resized_blob() {
    let t = catalog().await;

    let created = t
        .state
        .writer
        .create(input("Blue Door", 0.0, 0.0), upload("image/png", png(1600, 1200)))
        .await
        .unwrap();

    let key = created.store.photo.clone().unwrap();
    assert!(key.ends_with(".png"));
    assert!(t.config.uploads_dir.join(&key).exists());

    let bytes = std::fs::read(t.config.uploads_dir.join(&key)).unwrap();
    let stored = image::load_from_memory(&bytes).unwrap();
    assert_eq!((stored.width(), stored.height()), (800, 600));

    let found = t.state.catalog.find_by_slug("blue-door").await.unwrap().unwrap();
    assert_eq!(found.store.photo.as_deref(), Some(key.as_str()));
}

#[tokio::test]
async fn rejected_upload_leaves_store_untouched() {
    let t = catalog().await;
    let store = t.create_named("Blue Door").await;
    let id = store.store.id.to_string();

    let err = t
        .state
        .writer
        .update(
            &id,
            "user:alice",
            StoreUpdate {
                name: Some("Red Door".into()),
                ..Default::default()
            },
            upload("text/plain", b"just some text".to_vec()),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::UnsupportedMediaType);
    assert_eq!(err.http_status(), http::StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let after = t.state.catalog.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(after.store.name, "Blue Door");
    assert_eq!(after.store.slug, "blue-door");
    assert!(after.store.photo.is_none());
    assert!(!t.config.uploads_dir.exists());
}

#[tokio::test]
async fn undecodable_image_is_a_validation_error() {
    let t = catalog().await;

    let err = t
        .state
        .writer
        .create(input("Blue Door", 0.0, 0.0), upload("image/jpeg", b"not a jpeg".to_vec()))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InvalidImage);
    assert!(t.state.catalog.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn only_the_author_can_edit() {
    let t = catalog().await;
    let store = t.create_named("Blue Door").await;
    let id = store.store.id.to_string();

    let err = t
        .state
        .writer
        .update(
            &id,
            "user:mallory",
            StoreUpdate {
                name: Some("Hijacked".into()),
                ..Default::default()
            },
            upload("image/png", png(10, 10)),
        )
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::NotStoreOwner);
    let after = t.state.catalog.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(after.store.name, "Blue Door");
    assert!(!t.config.uploads_dir.exists());
}

#[tokio::test]
async fn update_of_missing_store_is_not_found() {
    let t = catalog().await;
    let err = t
        .state
        .writer
        .update("store:missing", "user:alice", StoreUpdate::default(), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::StoreNotFound);
}

#[tokio::test]
async fn update_changes_only_supplied_fields() {
    let t = catalog().await;
    let mut original = input("Blue Door", -79.38, 43.65);
    original.description = Some("Cozy".into());
    original.tags = vec!["Wifi".into()];
    let store = t.create(original).await;
    let id = store.store.id.to_string();

    let updated = t
        .state
        .writer
        .update(
            &id,
            "user:alice",
            StoreUpdate {
                tags: Some(vec!["Open Late".into(), " ".into()]),
                description: Some("   ".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(updated.store.name, "Blue Door");
    assert_eq!(updated.store.slug, "blue-door");
    assert_eq!(updated.store.tags, vec!["Open Late"]);
    assert!(updated.store.description.is_none());
    assert_eq!(updated.store.location, store.store.location);
    assert_eq!(updated.store.created, store.store.created);

    let moved = t
        .state
        .writer
        .update(
            &id,
            "user:alice",
            StoreUpdate {
                address: Some("2 Side St".into()),
                lng: Some(-79.0),
                lat: Some(43.0),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();
    assert_eq!(moved.store.location.address, "2 Side St");
    assert_eq!(moved.store.location.coordinates.lat(), 43.0);

    let err = t
        .state
        .writer
        .update(
            &id,
            "user:alice",
            StoreUpdate {
                lat: Some(10.0),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::RequiredField);
}

#[tokio::test]
async fn create_validates_input() {
    let t = catalog().await;

    let mut missing_address = input("Blue Door", 0.0, 0.0);
    missing_address.address = "  ".into();
    let err = t.state.writer.create(missing_address, None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
    assert_eq!(err.message, "You must supply an address!");

    let err = t
        .state
        .writer
        .create(input("Blue Door", 0.0, 95.0), None)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);

    assert!(t.state.catalog.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_row_write_after_upload_reports_orphaned_blob() {
    let t = catalog_with(|c| c.slug_max_attempts = 1).await;
    let first = t.create_named("Cafe").await;
    t.create_named("Cafe").await;
    t.state
        .writer
        .update(
            &first.store.id.to_string(),
            "user:alice",
            StoreUpdate {
                name: Some("Tea House".into()),
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    let err = t
        .state
        .writer
        .create(input("Cafe", 0.0, 0.0), upload("image/png", png(20, 20)))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::StorageInconsistency);
    let details = err.details.unwrap();
    let orphan = details.get("orphaned_blob").unwrap().as_str().unwrap().to_string();
    assert_eq!(
        details.get("cause").unwrap(),
        ErrorCode::SlugExhausted.code()
    );
    assert!(t.config.uploads_dir.join(&orphan).exists());
}

struct BrokenBlobs;

#[async_trait]
impl BlobStore for BrokenBlobs {
    async fn write(&self, _key: &str, _bytes: Vec<u8>) -> Result<(), AppError> {
        Err(AppError::new(ErrorCode::BlobWriteFailed))
    }
}

#[tokio::test]
async fn blob_failure_prevents_store_write() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_work_dir(dir.path());
    let state = CatalogState::with_blob_store(&config, Arc::new(BrokenBlobs))
        .await
        .unwrap();

    let err = state
        .writer
        .create(input("Blue Door", 0.0, 0.0), upload("image/png", png(20, 20)))
        .await
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::BlobWriteFailed);
    assert!(state.catalog.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn description_clear_is_applied_with_the_merge_or_not_at_all() {
    let t = catalog().await;
    let mut original = input("Blue Door", 0.0, 0.0);
    original.description = Some("Cozy".into());
    let store = t.create(original).await;
    t.create_named("Red Door").await;
    let repo = t.state.stores();

    let failed = repo
        .update(
            &store.store.id,
            StoreChanges {
                slug: Some("red-door".into()),
                description: Some(None),
                ..Default::default()
            },
        )
        .await;
    assert!(failed.is_err());

    let unchanged = repo.find_by_id(&store.store.id).await.unwrap().unwrap();
    assert_eq!(unchanged.slug, "blue-door");
    assert_eq!(unchanged.description.as_deref(), Some("Cozy"));

    let cleared = repo
        .update(
            &store.store.id,
            StoreChanges {
                tags: Some(vec!["Wifi".into()]),
                description: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(cleared.description.is_none());
    assert_eq!(cleared.tags, vec!["Wifi"]);
}
