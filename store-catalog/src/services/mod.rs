//! Service layer
//!
//! - [`SlugAssigner`] - slug derivation with unique-conflict retry
//! - [`CatalogService`] - discovery queries (slug, id, nearby, text, tags, pages)
//! - [`RankingService`] - tag popularity and top stores
//! - [`StoreWriter`] - create / update pipeline

pub mod catalog;
pub mod ranking;
pub mod slug;
pub mod store_writer;

pub use catalog::CatalogService;
pub use ranking::RankingService;
pub use slug::SlugAssigner;
pub use store_writer::StoreWriter;
