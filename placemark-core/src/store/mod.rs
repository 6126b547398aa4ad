//! Data access for tourist places.
//!
//! The [`PlaceStore`] trait defines the CRUD surface the repository builds
//! on: a full-collection read plus single-row insert, update, delete, and
//! favourite-flag writes, and a transactional batch insert used for
//! seeding. Implementations guarantee atomicity per single-row operation;
//! no cross-operation ordering beyond that is promised.

use thiserror::Error;

use crate::place::{Place, PlaceDraft};

#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use sqlite::{SqlitePlaceStore, SqlitePlaceStoreError};

/// Backend failure attached to a [`PlaceStoreError`] variant.
///
/// Boxed so the trait stays neutral across storage backends.
pub type BackendError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by [`PlaceStore`] operations.
///
/// Each variant names the failed operation and carries the target record's
/// context, so callers can produce a user-facing message without inspecting
/// the source chain.
#[derive(Debug, Error)]
pub enum PlaceStoreError {
    /// Reading the full place collection failed.
    #[error("failed to read places")]
    Read {
        /// Source error returned by the backend.
        #[source]
        source: BackendError,
    },
    /// Persisting a new place failed.
    #[error("failed to insert place {name:?}")]
    Insert {
        /// Name of the place being inserted.
        name: String,
        /// Source error returned by the backend.
        #[source]
        source: BackendError,
    },
    /// Replacing an existing place failed.
    #[error("failed to update place {id}")]
    Update {
        /// Identifier of the place being updated.
        id: i64,
        /// Source error returned by the backend.
        #[source]
        source: BackendError,
    },
    /// Removing a place failed.
    #[error("failed to delete place {id}")]
    Delete {
        /// Identifier of the place being deleted.
        id: i64,
        /// Source error returned by the backend.
        #[source]
        source: BackendError,
    },
    /// Writing the favourite flag failed.
    #[error("failed to set favourite flag on place {id}")]
    SetFavorite {
        /// Identifier of the place being flagged.
        id: i64,
        /// Source error returned by the backend.
        #[source]
        source: BackendError,
    },
    /// A transactional batch insert failed; no rows were persisted.
    #[error("failed to insert batch of {count} places")]
    Batch {
        /// Number of places in the failed batch.
        count: usize,
        /// Source error returned by the backend.
        #[source]
        source: BackendError,
    },
    /// The targeted identifier does not exist. Existing records are
    /// untouched when this is returned.
    #[error("no place with id {id}")]
    NotFound {
        /// Identifier that matched no stored place.
        id: i64,
    },
}

/// Durable storage of [`Place`] records.
///
/// Implementations assign identifiers and creation timestamps on insert
/// and report mutations of missing rows as
/// [`PlaceStoreError::NotFound`] rather than silently succeeding.
pub trait PlaceStore {
    /// Return every stored place ordered by insertion (ascending id).
    fn all(&self) -> Result<Vec<Place>, PlaceStoreError>;

    /// Persist a draft, assigning a fresh unique id and creation
    /// timestamp, and return the stored record.
    fn insert(&mut self, draft: &PlaceDraft) -> Result<Place, PlaceStoreError>;

    /// Replace the stored record matching `place.id` field-for-field.
    /// The creation timestamp is immutable and is not rewritten.
    fn update(&mut self, place: &Place) -> Result<(), PlaceStoreError>;

    /// Remove exactly the record matching `id`.
    fn delete(&mut self, id: i64) -> Result<(), PlaceStoreError>;

    /// Partial update of the favourite flag only.
    fn set_favorite(&mut self, id: i64, favorite: bool) -> Result<(), PlaceStoreError>;

    /// Insert every draft as one all-or-nothing unit.
    ///
    /// Used by seeding so an interrupted run leaves no partial rows.
    fn insert_batch(&mut self, drafts: &[PlaceDraft]) -> Result<Vec<Place>, PlaceStoreError>;
}
