//! Repository Module
//!
//! Query access to the SurrealDB tables. Record ids use the `table:key`
//! form throughout:
//!   - parse: `"store:abc".parse::<RecordId>()`
//!   - build: `RecordId::from_table_key("store", "abc")`

pub mod review;
pub mod store;

pub use review::ReviewRepository;
pub use store::StoreRepository;

use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    /// Another transaction touched the same keys first; safe to retry
    #[error("Write conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        let message = err.to_string();
        if is_unique_violation(&message) {
            RepoError::Duplicate(message)
        } else if is_retryable_conflict(&message) {
            RepoError::Conflict(message)
        } else {
            RepoError::Database(message)
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// SurrealDB reports unique index conflicts as
/// "Database index `name` already contains ..."
pub fn is_unique_violation(message: &str) -> bool {
    message.contains("already contains")
}

/// RocksDB transactions are optimistic: the loser of two concurrent commits
/// on the same keys fails with "... read or write conflict. This transaction
/// can be retried"
pub fn is_retryable_conflict(message: &str) -> bool {
    message.contains("can be retried") || message.contains("read or write conflict")
}

/// Parse `"table:key"` or a bare key into a record id of `table`.
///
/// Ids naming a different table are rejected.
pub fn parse_record_id(table: &str, id: &str) -> RepoResult<RecordId> {
    match id.parse::<RecordId>() {
        Ok(record) if record.table() == table => Ok(record),
        Ok(record) => Err(RepoError::Validation(format!(
            "Expected a {} id, got {}",
            table, record
        ))),
        Err(_) if !id.is_empty() && !id.contains(':') => Ok(RecordId::from_table_key(table, id)),
        Err(_) => Err(RepoError::Validation(format!("Invalid {} id: {}", table, id))),
    }
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
