//! Database Models

pub mod serde_helpers;

pub mod review;
pub mod store;

pub use review::{Review, ReviewCreate};
pub use store::{
    NearbyStore, RankedStore, Store, StoreChanges, StoreInput, StorePage, StoreRecord,
    StoreUpdate, StoreWithReviews,
};
