//! Default place payload for first-run seeding.
//!
//! The seed is a static JSON document embedded in the crate, decoded and
//! validated once, and kept separate from the insertion logic. The
//! records describe the known points of interest of Dolores Hidalgo,
//! Guanajuato.

use std::sync::OnceLock;

use geo::Coord;
use serde::Deserialize;
use thiserror::Error;

use crate::place::{PlaceDraft, PlaceError};
use crate::store::PlaceStoreError;

static PAYLOAD: &str = include_str!("default_places.json");

static CACHE: OnceLock<Vec<PlaceDraft>> = OnceLock::new();

/// Default centre of the town map (Dolores Hidalgo).
pub const TOWN_CENTER: Coord<f64> = Coord {
    x: -100.9318,
    y: 21.1560,
};

/// Errors raised while seeding default places.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The embedded payload was not valid JSON.
    #[error("failed to decode the default places payload")]
    Payload {
        /// Source error produced by `serde_json`.
        #[source]
        source: serde_json::Error,
    },
    /// A payload record failed place validation.
    #[error("default place {name:?} failed validation")]
    InvalidRecord {
        /// Name of the offending record.
        name: String,
        /// Validation failure.
        #[source]
        source: PlaceError,
    },
    /// Writing the seed batch to the store failed.
    #[error(transparent)]
    Store(#[from] PlaceStoreError),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct SeedRecord {
    name: String,
    description: String,
    latitude: f64,
    longitude: f64,
    category: String,
    marker_color: String,
}

/// The validated default place list, decoded on first use.
///
/// # Errors
/// Returns [`SeedError`] when the embedded payload cannot be decoded or a
/// record fails validation; both indicate a broken build artefact.
pub fn default_places() -> Result<Vec<PlaceDraft>, SeedError> {
    if let Some(cached) = CACHE.get() {
        return Ok(cached.clone());
    }
    let records: Vec<SeedRecord> =
        serde_json::from_str(PAYLOAD).map_err(|source| SeedError::Payload { source })?;
    let drafts = records
        .into_iter()
        .map(draft_from_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CACHE.get_or_init(|| drafts).clone())
}

fn draft_from_record(record: SeedRecord) -> Result<PlaceDraft, SeedError> {
    let SeedRecord {
        name,
        description,
        latitude,
        longitude,
        category,
        marker_color,
    } = record;
    PlaceDraft::new(
        name.clone(),
        description,
        Coord {
            x: longitude,
            y: latitude,
        },
        category,
        marker_color,
    )
    .map_err(|source| SeedError::InvalidRecord { name, source })
}
