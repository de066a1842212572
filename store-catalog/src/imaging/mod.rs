//! Image ingestion pipeline and blob storage

pub mod blob;
pub mod ingest;

pub use blob::{BlobStore, FsBlobStore};
pub use ingest::{PhotoIngestor, PhotoUpload, StoredPhoto, parse_content_type, photo_filename};
