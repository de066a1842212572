//! Request intake helpers

pub mod upload;

pub use upload::StoreForm;
