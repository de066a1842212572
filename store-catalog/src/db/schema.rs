//! Catalog schema
//!
//! Tables stay schemaless; the definitions below only carry the indexes the
//! catalog relies on. Every statement is idempotent so the schema is applied
//! on each startup.

/// Unique slug index name, reported by the engine on conflicts
pub const SLUG_INDEX: &str = "store_slug_unique";

pub const SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS store SCHEMALESS;
DEFINE TABLE IF NOT EXISTS review SCHEMALESS;

DEFINE INDEX IF NOT EXISTS store_slug_unique ON TABLE store FIELDS slug UNIQUE;
DEFINE INDEX IF NOT EXISTS store_created ON TABLE store FIELDS created;

DEFINE ANALYZER IF NOT EXISTS store_text TOKENIZERS blank, class FILTERS lowercase, ascii;
DEFINE INDEX IF NOT EXISTS store_name_search ON TABLE store FIELDS name SEARCH ANALYZER store_text BM25;
DEFINE INDEX IF NOT EXISTS store_description_search ON TABLE store FIELDS description SEARCH ANALYZER store_text BM25;

DEFINE INDEX IF NOT EXISTS review_store ON TABLE review FIELDS store;
"#;
