//! Test-only store implementations used by unit and behaviour tests.

use chrono::Utc;

use crate::place::{Place, PlaceDraft};
use crate::store::{BackendError, PlaceStore, PlaceStoreError};

/// In-memory `PlaceStore` used in tests.
///
/// The store performs a linear scan and is intended only for small
/// datasets.
#[derive(Default, Debug)]
pub struct MemoryPlaceStore {
    places: Vec<Place>,
    next_id: i64,
}

impl MemoryPlaceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated from a collection of drafts.
    pub fn with_drafts<I>(drafts: I) -> Self
    where
        I: IntoIterator<Item = PlaceDraft>,
    {
        let mut store = Self::default();
        for draft in drafts {
            store.push_draft(&draft);
        }
        store
    }

    fn push_draft(&mut self, draft: &PlaceDraft) -> Place {
        self.next_id += 1;
        let place = Place::from_draft(self.next_id, draft.clone(), Utc::now());
        self.places.push(place.clone());
        place
    }

    fn find_mut(&mut self, id: i64) -> Result<&mut Place, PlaceStoreError> {
        self.places
            .iter_mut()
            .find(|place| place.id == id)
            .ok_or(PlaceStoreError::NotFound { id })
    }
}

impl PlaceStore for MemoryPlaceStore {
    fn all(&self) -> Result<Vec<Place>, PlaceStoreError> {
        Ok(self.places.clone())
    }

    fn insert(&mut self, draft: &PlaceDraft) -> Result<Place, PlaceStoreError> {
        Ok(self.push_draft(draft))
    }

    fn update(&mut self, place: &Place) -> Result<(), PlaceStoreError> {
        let stored = self.find_mut(place.id)?;
        let created_at = stored.created_at;
        *stored = place.clone();
        stored.created_at = created_at;
        Ok(())
    }

    fn delete(&mut self, id: i64) -> Result<(), PlaceStoreError> {
        let index = self
            .places
            .iter()
            .position(|place| place.id == id)
            .ok_or(PlaceStoreError::NotFound { id })?;
        self.places.remove(index);
        Ok(())
    }

    fn set_favorite(&mut self, id: i64, favorite: bool) -> Result<(), PlaceStoreError> {
        self.find_mut(id)?.is_favorite = favorite;
        Ok(())
    }

    fn insert_batch(&mut self, drafts: &[PlaceDraft]) -> Result<Vec<Place>, PlaceStoreError> {
        Ok(drafts.iter().map(|draft| self.push_draft(draft)).collect())
    }
}

/// Store whose reads stay empty and whose mutations always fail.
///
/// Used to exercise error propagation without touching real storage.
#[derive(Default, Debug, Clone, Copy)]
pub struct FailingPlaceStore;

fn synthetic_failure() -> BackendError {
    Box::new(std::io::Error::other("synthetic storage failure"))
}

impl PlaceStore for FailingPlaceStore {
    fn all(&self) -> Result<Vec<Place>, PlaceStoreError> {
        Ok(Vec::new())
    }

    fn insert(&mut self, draft: &PlaceDraft) -> Result<Place, PlaceStoreError> {
        Err(PlaceStoreError::Insert {
            name: draft.name.clone(),
            source: synthetic_failure(),
        })
    }

    fn update(&mut self, place: &Place) -> Result<(), PlaceStoreError> {
        Err(PlaceStoreError::Update {
            id: place.id,
            source: synthetic_failure(),
        })
    }

    fn delete(&mut self, id: i64) -> Result<(), PlaceStoreError> {
        Err(PlaceStoreError::Delete {
            id,
            source: synthetic_failure(),
        })
    }

    fn set_favorite(&mut self, id: i64, _favorite: bool) -> Result<(), PlaceStoreError> {
        Err(PlaceStoreError::SetFavorite {
            id,
            source: synthetic_failure(),
        })
    }

    fn insert_batch(&mut self, drafts: &[PlaceDraft]) -> Result<Vec<Place>, PlaceStoreError> {
        Err(PlaceStoreError::Batch {
            count: drafts.len(),
            source: synthetic_failure(),
        })
    }
}
