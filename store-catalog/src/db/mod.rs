//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine) bootstrap and the catalog schema

pub mod models;
pub mod repository;
pub mod schema;

use crate::core::Config;
use crate::utils::AppError;
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

/// Database service, owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open the database at `config.database_path()` and apply the schema
    pub async fn new(config: &Config) -> Result<Self, AppError> {
        Self::open(&config.database_path(), &config.database_ns, &config.database_db).await
    }

    pub async fn open(path: &Path, ns: &str, database: &str) -> Result<Self, AppError> {
        std::fs::create_dir_all(path).map_err(|e| {
            AppError::database(format!("Failed to create database directory: {e}"))
        })?;

        let db: Surreal<Db> = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(ns)
            .use_db(database)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        tracing::info!(path = %path.display(), ns, db = database, "Database connection established");

        let service = Self { db };
        service.apply_schema().await?;
        Ok(service)
    }

    /// Define tables and indexes
    pub async fn apply_schema(&self) -> Result<(), AppError> {
        self.db
            .query(schema::SCHEMA)
            .await
            .and_then(|response| response.check())
            .map_err(|e| AppError::database(format!("Failed to apply schema: {e}")))?;

        tracing::info!("Database schema applied");
        Ok(())
    }
}
