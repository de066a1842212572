use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::{ReviewRepository, StoreRepository};
use crate::imaging::{BlobStore, FsBlobStore, PhotoIngestor};
use crate::services::{CatalogService, RankingService, SlugAssigner, StoreWriter};
use crate::utils::AppResult;

/// Catalog state, holds every service
///
/// | Field | Purpose |
/// |-------|---------|
/// | config | configuration (immutable) |
/// | db | embedded SurrealDB |
/// | catalog | discovery queries |
/// | ranking | tag popularity, top stores |
/// | writer | store create / update |
/// | blobs | photo storage |
///
/// Every field is a handle, so cloning is cheap.
#[derive(Clone)]
pub struct CatalogState {
    pub config: Config,
    pub db: Surreal<Db>,
    pub catalog: CatalogService,
    pub ranking: RankingService,
    pub writer: StoreWriter,
    pub blobs: Arc<dyn BlobStore>,
}

impl CatalogState {
    /// Open the database under `config.work_dir` and wire the services
    /// with a filesystem blob store at `config.uploads_dir`
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let blobs: Arc<dyn BlobStore> = Arc::new(FsBlobStore::new(&config.uploads_dir));
        Self::with_blob_store(config, blobs).await
    }

    /// Same as [`CatalogState::initialize`] with a caller-supplied blob store
    pub async fn with_blob_store(config: &Config, blobs: Arc<dyn BlobStore>) -> AppResult<Self> {
        let db = DbService::new(config).await?.db;

        let stores = StoreRepository::new(db.clone());
        let reviews = ReviewRepository::new(db.clone());

        let catalog = CatalogService::new(stores.clone(), reviews.clone(), config);
        let ranking = RankingService::new(
            stores.clone(),
            reviews,
            catalog.clone(),
            config.top_stores_limit,
        );
        let slugs = SlugAssigner::new(stores.clone(), config.slug_max_attempts);
        let photos = PhotoIngestor::from_config(blobs.clone(), config);
        let writer = StoreWriter::new(stores, catalog.clone(), slugs, photos);

        tracing::info!(
            work_dir = %config.work_dir.display(),
            uploads = %config.uploads_dir.display(),
            "Catalog state initialized"
        );

        Ok(Self {
            config: config.clone(),
            db,
            catalog,
            ranking,
            writer,
            blobs,
        })
    }

    pub fn reviews(&self) -> ReviewRepository {
        ReviewRepository::new(self.db.clone())
    }

    pub fn stores(&self) -> StoreRepository {
        StoreRepository::new(self.db.clone())
    }
}
