//! Shared fixtures: a catalog on a fresh RocksDB directory

#![allow(dead_code)]

use std::io::Cursor;

use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use shared::util::now_millis;
use store_catalog::db::models::{ReviewCreate, StoreInput, StoreWithReviews};
use store_catalog::{CatalogState, Config};
use tempfile::TempDir;

pub struct TestCatalog {
    pub state: CatalogState,
    pub config: Config,
    // keeps the database directory alive
    _dir: TempDir,
}

pub async fn catalog() -> TestCatalog {
    catalog_with(|_| {}).await
}

pub async fn catalog_with(tweak: impl FnOnce(&mut Config)) -> TestCatalog {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::with_work_dir(dir.path());
    tweak(&mut config);
    let state = CatalogState::initialize(&config).await.unwrap();
    TestCatalog {
        state,
        config,
        _dir: dir,
    }
}

pub fn input(name: &str, lng: f64, lat: f64) -> StoreInput {
    StoreInput {
        name: name.to_string(),
        description: None,
        address: format!("{} street", name),
        lng,
        lat,
        tags: Vec::new(),
        author: "user:alice".to_string(),
    }
}

impl TestCatalog {
    pub async fn create(&self, input: StoreInput) -> StoreWithReviews {
        self.state.writer.create(input, None).await.unwrap()
    }

    pub async fn create_named(&self, name: &str) -> StoreWithReviews {
        self.create(input(name, 0.0, 0.0)).await
    }

    pub async fn review(&self, store: &StoreWithReviews, rating: impl Into<f64>) {
        self.state
            .reviews()
            .create(ReviewCreate {
                store: store.store.id.clone(),
                rating: rating.into(),
                text: None,
                author: Some("user:bob".into()),
                created: now_millis(),
            })
            .await
            .unwrap();
    }
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = ImageBuffer::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 64]));
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}
