//! Facade crate for the Placemark place store.
//!
//! This crate re-exports the core domain types and exposes the optional
//! SQLite store and test support behind feature flags.

#![forbid(unsafe_code)]

pub use placemark_core::{
    BackendError, Place, PlaceDraft, PlaceError, PlaceRepository, PlaceStore, PlaceStoreError,
    SeedError, TOWN_CENTER, default_places,
};

#[cfg(feature = "store-sqlite")]
pub use placemark_core::{SqlitePlaceStore, SqlitePlaceStoreError};

#[cfg(feature = "test-support")]
pub use placemark_core::test_support::{FailingPlaceStore, MemoryPlaceStore};
