//! Durable, observable storage for a town's tourist places.
//!
//! The crate provides the data layer of a tourism map: a validated
//! [`Place`] model, the [`PlaceStore`] CRUD trait with a SQLite
//! implementation, and a [`PlaceRepository`] that publishes a full
//! snapshot of the collection to subscribers after every successful
//! mutation. A static seed payload fills an empty store with the town's
//! known points of interest on first run.
//!
//! Presentation concerns (map rendering, dialogs, navigation) are
//! intentionally absent; consumers subscribe to the repository feed and
//! forward user intents to its CRUD operations.

#![forbid(unsafe_code)]

mod place;
mod repository;
mod seed;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use place::{Place, PlaceDraft, PlaceError};
pub use repository::PlaceRepository;
pub use seed::{SeedError, TOWN_CENTER, default_places};
pub use store::{BackendError, PlaceStore, PlaceStoreError};

#[cfg(feature = "store-sqlite")]
pub use store::{SqlitePlaceStore, SqlitePlaceStoreError};
