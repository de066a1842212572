//! Shared types for the store catalog
//!
//! Storage-independent pieces used by the catalog crate: the error system,
//! location and ranking models, slug derivation and the pure aggregation
//! stages.

pub mod error;
pub mod models;
pub mod ranking;
pub mod slug;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
