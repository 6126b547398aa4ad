//! Behaviour tests for the repository's snapshot feed and seeding.

use geo::Coord;
use placemark_core::{
    Place, PlaceDraft, PlaceRepository, PlaceStore, PlaceStoreError, SqlitePlaceStore,
    default_places,
};
use rstest::{fixture, rstest};

fn repository() -> PlaceRepository<SqlitePlaceStore> {
    let store = SqlitePlaceStore::open_in_memory().expect("open in-memory store");
    PlaceRepository::new(store).expect("wrap store")
}

#[fixture]
fn parish() -> PlaceDraft {
    PlaceDraft::new(
        "Parish",
        "Town parish",
        Coord {
            x: -100.9314,
            y: 21.1558,
        },
        "church",
        "#FF0000",
    )
    .expect("valid draft")
}

#[rstest]
fn every_successful_mutation_publishes_a_snapshot(parish: PlaceDraft) {
    let mut repository = repository();
    let mut feed = repository.places();

    let place = repository.insert_place(&parish).expect("insert");
    assert!(feed.has_changed().expect("feed open"));
    assert_eq!(*feed.borrow_and_update(), vec![place.clone()]);

    let favorite = repository.toggle_favorite(place.id, false).expect("toggle");
    assert!(favorite);
    assert!(feed.has_changed().expect("feed open"));
    assert!(feed.borrow_and_update().iter().all(|p| p.is_favorite));

    repository.delete_place(place.id).expect("delete");
    assert!(feed.has_changed().expect("feed open"));
    assert!(feed.borrow_and_update().is_empty());
}

#[tokio::test]
async fn subscribers_are_pushed_the_new_snapshot() {
    let mut repository = repository();
    let mut feed = repository.places();

    let draft = PlaceDraft::new(
        "Museo Casa de Hidalgo",
        "Casa del cura Hidalgo",
        Coord {
            x: -100.9327,
            y: 21.1556,
        },
        "museo",
        "#1565C0",
    )
    .expect("valid draft");
    let place = repository.insert_place(&draft).expect("insert");

    feed.changed().await.expect("feed open");
    assert_eq!(*feed.borrow(), vec![place]);
}

#[rstest]
fn late_subscribers_see_the_current_snapshot(parish: PlaceDraft) {
    let mut repository = repository();
    let place = repository.insert_place(&parish).expect("insert");

    let feed = repository.places();
    assert_eq!(*feed.borrow(), vec![place]);
}

#[rstest]
fn failed_mutations_publish_nothing(parish: PlaceDraft) {
    let store = RejectingStore;
    let mut repository = PlaceRepository::new(store).expect("wrap store");
    let mut feed = repository.places();

    assert!(repository.insert_place(&parish).is_err());
    assert!(repository.delete_place(1).is_err());
    assert!(!feed.has_changed().expect("feed open"));
    assert!(repository.snapshot().is_empty());
}

#[rstest]
fn not_found_surfaces_without_disturbing_the_feed(parish: PlaceDraft) {
    let mut repository = repository();
    let place = repository.insert_place(&parish).expect("insert");
    let mut feed = repository.places();

    let error = repository
        .delete_place(place.id + 1)
        .expect_err("missing id should fail");
    assert!(matches!(error, PlaceStoreError::NotFound { .. }));
    assert!(!feed.has_changed().expect("feed open"));
    assert_eq!(repository.snapshot(), vec![place]);
}

#[rstest]
fn ensure_seeded_inserts_the_default_list_exactly_once() {
    let expected = default_places().expect("decode seed payload").len();
    let mut repository = repository();

    assert_eq!(repository.ensure_seeded().expect("seed"), expected);
    assert_eq!(repository.snapshot().len(), expected);

    assert_eq!(repository.ensure_seeded().expect("skip"), 0);
    assert_eq!(repository.snapshot().len(), expected);
}

#[rstest]
fn ensure_seeded_skips_a_store_with_user_data(parish: PlaceDraft) {
    let mut repository = repository();
    let place = repository.insert_place(&parish).expect("insert");

    assert_eq!(repository.ensure_seeded().expect("skip"), 0);
    assert_eq!(repository.snapshot(), vec![place]);
}

/// Store whose mutations are rejected outright; reads stay empty.
struct RejectingStore;

fn rejected() -> placemark_core::BackendError {
    Box::new(std::io::Error::other("storage offline"))
}

impl PlaceStore for RejectingStore {
    fn all(&self) -> Result<Vec<Place>, PlaceStoreError> {
        Ok(Vec::new())
    }

    fn insert(&mut self, draft: &PlaceDraft) -> Result<Place, PlaceStoreError> {
        Err(PlaceStoreError::Insert {
            name: draft.name.clone(),
            source: rejected(),
        })
    }

    fn update(&mut self, place: &Place) -> Result<(), PlaceStoreError> {
        Err(PlaceStoreError::Update {
            id: place.id,
            source: rejected(),
        })
    }

    fn delete(&mut self, id: i64) -> Result<(), PlaceStoreError> {
        Err(PlaceStoreError::Delete {
            id,
            source: rejected(),
        })
    }

    fn set_favorite(&mut self, id: i64, _favorite: bool) -> Result<(), PlaceStoreError> {
        Err(PlaceStoreError::SetFavorite {
            id,
            source: rejected(),
        })
    }

    fn insert_batch(&mut self, drafts: &[PlaceDraft]) -> Result<Vec<Place>, PlaceStoreError> {
        Err(PlaceStoreError::Batch {
            count: drafts.len(),
            source: rejected(),
        })
    }
}
