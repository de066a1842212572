//! Core module: configuration and the shared catalog state
//!
//! - [`Config`] - environment-driven configuration
//! - [`CatalogState`] - database handle plus every service, cheap to clone

pub mod config;
pub mod state;

pub use config::Config;
pub use state::CatalogState;
