//! Mediating layer between the store and its consumers.
//!
//! The repository passes CRUD calls through to the owned store and keeps a
//! live snapshot feed: after every successful mutation it re-reads the
//! full collection and publishes it to all subscribers over a watch
//! channel. Failed mutations publish nothing, so subscribers only ever
//! observe states the store actually reached.

use std::fmt;

use log::{debug, info, warn};
use tokio::sync::watch;

use crate::place::{Place, PlaceDraft};
use crate::seed::{self, SeedError};
use crate::store::{PlaceStore, PlaceStoreError};

/// Repository over a [`PlaceStore`] with a live snapshot feed.
///
/// The repository holds no row state of its own; all state lives in the
/// store. Subscription lifetime is the receiver's lifetime — drop the
/// receiver to cancel.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use placemark_core::{PlaceDraft, PlaceRepository, SqlitePlaceStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = SqlitePlaceStore::open_in_memory()?;
/// let mut repository = PlaceRepository::new(store)?;
///
/// let draft = PlaceDraft::new(
///     "Parish",
///     "Town parish",
///     Coord { x: -100.9314, y: 21.1558 },
///     "church",
///     "#FF0000",
/// )?;
/// let place = repository.insert_place(&draft)?;
/// assert_eq!(repository.snapshot(), vec![place]);
/// # Ok(())
/// # }
/// ```
pub struct PlaceRepository<S> {
    store: S,
    feed: watch::Sender<Vec<Place>>,
}

impl<S> fmt::Debug for PlaceRepository<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaceRepository")
            .field("places", &self.feed.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<S: PlaceStore> PlaceRepository<S> {
    /// Wrap a store and publish its current contents as the first snapshot.
    ///
    /// # Errors
    /// Returns [`PlaceStoreError`] when the initial read fails.
    pub fn new(store: S) -> Result<Self, PlaceStoreError> {
        let initial = store.all()?;
        let (feed, _) = watch::channel(initial);
        Ok(Self { store, feed })
    }

    /// Subscribe to the live view of all stored places.
    ///
    /// Every successful mutation re-delivers the full current collection
    /// to each receiver. The repository never closes the feed; receivers
    /// cancel by dropping.
    pub fn places(&self) -> watch::Receiver<Vec<Place>> {
        self.feed.subscribe()
    }

    /// The most recently published snapshot, without subscribing.
    pub fn snapshot(&self) -> Vec<Place> {
        self.feed.borrow().clone()
    }

    /// Persist a new place and return the stored record.
    ///
    /// # Errors
    /// Returns [`PlaceStoreError`] when the insert or the follow-up read
    /// fails; the feed is left on its previous snapshot.
    pub fn insert_place(&mut self, draft: &PlaceDraft) -> Result<Place, PlaceStoreError> {
        debug!("adding place {:?}", draft.name);
        let place = self.store.insert(draft)?;
        self.refresh()?;
        info!("added place {:?} with id {}", place.name, place.id);
        Ok(place)
    }

    /// Replace an existing place field-for-field.
    ///
    /// # Errors
    /// Returns [`PlaceStoreError::NotFound`] when `place.id` does not
    /// exist, or another [`PlaceStoreError`] on storage failure.
    pub fn update_place(&mut self, place: &Place) -> Result<(), PlaceStoreError> {
        debug!("updating place {}", place.id);
        self.store.update(place)?;
        self.refresh()
    }

    /// Delete the place matching `id`.
    ///
    /// # Errors
    /// Returns [`PlaceStoreError::NotFound`] when `id` does not exist, or
    /// another [`PlaceStoreError`] on storage failure.
    pub fn delete_place(&mut self, id: i64) -> Result<(), PlaceStoreError> {
        warn!("deleting place {id}");
        self.store.delete(id)?;
        self.refresh()
    }

    /// Invert the favourite flag and return the new value.
    ///
    /// Toggling twice restores the original value.
    ///
    /// # Errors
    /// Returns [`PlaceStoreError::NotFound`] when `id` does not exist, or
    /// another [`PlaceStoreError`] on storage failure.
    pub fn toggle_favorite(
        &mut self,
        id: i64,
        currently_favorite: bool,
    ) -> Result<bool, PlaceStoreError> {
        let favorite = !currently_favorite;
        debug!("setting favourite flag on place {id} to {favorite}");
        self.store.set_favorite(id, favorite)?;
        self.refresh()?;
        Ok(favorite)
    }

    /// Insert the full default payload as one transactional batch.
    ///
    /// Does not check whether the store is empty; calling it twice
    /// duplicates records. Use [`Self::ensure_seeded`] for the guarded
    /// variant.
    ///
    /// # Errors
    /// Returns [`SeedError`] when the payload cannot be decoded or the
    /// batch insert fails; a failed batch leaves no partial rows.
    pub fn seed_default_places(&mut self) -> Result<Vec<Place>, SeedError> {
        let drafts = seed::default_places()?;
        let inserted = self.store.insert_batch(&drafts).map_err(SeedError::Store)?;
        self.refresh().map_err(SeedError::Store)?;
        info!("seeded {} default places", inserted.len());
        Ok(inserted)
    }

    /// Seed the default places only when the store is empty.
    ///
    /// Returns the number of inserted records; `0` when the store was
    /// already populated.
    ///
    /// # Errors
    /// Returns [`SeedError`] when seeding an empty store fails.
    pub fn ensure_seeded(&mut self) -> Result<usize, SeedError> {
        if !self.feed.borrow().is_empty() {
            debug!("store already populated; skipping default places");
            return Ok(0);
        }
        info!("seeding default places into an empty store");
        Ok(self.seed_default_places()?.len())
    }

    fn refresh(&mut self) -> Result<(), PlaceStoreError> {
        let places = self.store.all()?;
        self.feed.send_replace(places);
        Ok(())
    }
}
