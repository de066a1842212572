//! Store Catalog - store directory backend core
//!
//! # Overview
//!
//! - **Slug assignment** (`services/slug`): unique, human-readable store ids
//!   backed by a unique index and bounded retry
//! - **Catalog queries** (`services/catalog`): slug / id / nearby / text /
//!   tag lookups, reviews attached on every read
//! - **Ranking** (`services/ranking`): tag popularity and top stores
//! - **Photo ingestion** (`imaging`): validate, rename, resize, store
//!
//! # Layout
//!
//! ```text
//! store-catalog/src/
//! ├── core/          # config, state
//! ├── db/            # SurrealDB bootstrap, schema, models, repositories
//! ├── imaging/       # photo pipeline, blob store
//! ├── services/      # slug, catalog, ranking, store writes
//! ├── handler/       # multipart intake
//! └── utils/         # errors, logging
//! ```

pub mod core;
pub mod db;
pub mod handler;
pub mod imaging;
pub mod services;
pub mod utils;

pub use core::{CatalogState, Config};
pub use handler::StoreForm;
pub use imaging::{BlobStore, FsBlobStore, PhotoIngestor, PhotoUpload};
pub use services::{CatalogService, RankingService, SlugAssigner, StoreWriter};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// Days of rotated log files kept by [`setup_environment`]
const LOG_RETENTION_DAYS: i64 = 14;

/// Load `.env`, read the configuration and start logging.
///
/// Returns the loaded configuration.
pub fn setup_environment() -> anyhow::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    let log_dir = config.log_dir();
    init_logger_with_file(&config.log_level, config.log_json, Some(&log_dir))?;

    match cleanup_old_logs(&log_dir, LOG_RETENTION_DAYS) {
        Ok(0) => {}
        Ok(removed) => tracing::info!(removed, "Old log files cleaned up"),
        Err(e) => tracing::warn!(error = %e, "Log cleanup failed"),
    }

    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir.display(),
        "Environment ready"
    );
    Ok(config)
}
