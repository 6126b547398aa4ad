//! SQLite-backed store for tourist places.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use geo::Coord;
use rusqlite::{Connection, Row, params, types::Type};
use thiserror::Error;

use crate::place::{Place, PlaceDraft};

use super::{PlaceStore, PlaceStoreError};

const CREATE_PLACES_TABLE: &str = "CREATE TABLE IF NOT EXISTS places (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    lon REAL NOT NULL,
    lat REAL NOT NULL,
    category TEXT NOT NULL,
    marker_color TEXT NOT NULL,
    favorite INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL
)";

const SELECT_PLACES: &str = "SELECT id, name, description, lon, lat, category, marker_color, \
     favorite, created_at FROM places ORDER BY id";

const INSERT_PLACE: &str = "INSERT INTO places \
     (name, description, lon, lat, category, marker_color, favorite, created_at) \
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)";

/// Errors raised when opening or initialising the SQLite database.
#[derive(Debug, Error)]
pub enum SqlitePlaceStoreError {
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating the `places` table failed.
    #[error("failed to create places schema")]
    CreateSchema {
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
}

/// A stored creation timestamp that chrono cannot represent.
#[derive(Debug, Error)]
#[error("stored timestamp {0} is outside the representable range")]
struct TimestampOutOfRange(i64);

/// [`PlaceStore`] backed by a single-table SQLite database.
///
/// The database file survives process restarts; `created_at` is persisted
/// as Unix milliseconds. Single-row writes rely on SQLite's own atomicity,
/// and the seeding batch runs inside one transaction.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use placemark_core::{PlaceDraft, PlaceStore, SqlitePlaceStore};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqlitePlaceStore::open_in_memory()?;
/// let draft = PlaceDraft::new(
///     "Parish",
///     "Town parish",
///     Coord { x: -100.9314, y: 21.1558 },
///     "church",
///     "#FF0000",
/// )?;
/// let place = store.insert(&draft)?;
/// assert_eq!(store.all()?, vec![place]);
/// # Ok(())
/// # }
/// ```
pub struct SqlitePlaceStore {
    connection: Connection,
}

impl fmt::Debug for SqlitePlaceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlitePlaceStore").finish_non_exhaustive()
    }
}

impl SqlitePlaceStore {
    /// Open (or create) the database at `path` and initialise the schema.
    ///
    /// # Errors
    /// Returns [`SqlitePlaceStoreError`] when the file cannot be opened or
    /// the `places` table cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SqlitePlaceStoreError> {
        let path = path.as_ref();
        let connection =
            Connection::open(path).map_err(|source| SqlitePlaceStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            })?;
        Self::with_connection(connection)
    }

    /// Open a private in-memory database, useful for tests and previews.
    ///
    /// # Errors
    /// Returns [`SqlitePlaceStoreError`] when the database cannot be
    /// created or the `places` table cannot be initialised.
    pub fn open_in_memory() -> Result<Self, SqlitePlaceStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SqlitePlaceStoreError::OpenDatabase {
                path: PathBuf::from(":memory:"),
                source,
            })?;
        Self::with_connection(connection)
    }

    fn with_connection(connection: Connection) -> Result<Self, SqlitePlaceStoreError> {
        connection
            .execute(CREATE_PLACES_TABLE, [])
            .map_err(|source| SqlitePlaceStoreError::CreateSchema { source })?;
        Ok(Self { connection })
    }
}

fn place_from_row(row: &Row<'_>) -> rusqlite::Result<Place> {
    let created_ms: i64 = row.get(8)?;
    let created_at = DateTime::from_timestamp_millis(created_ms).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            8,
            Type::Integer,
            Box::new(TimestampOutOfRange(created_ms)),
        )
    })?;
    Ok(Place {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        location: Coord {
            x: row.get(3)?,
            y: row.get(4)?,
        },
        category: row.get(5)?,
        marker_color: row.get(6)?,
        is_favorite: row.get(7)?,
        created_at,
    })
}

// Persisted precision is milliseconds; truncate up front so the record
// returned from an insert is identical to what a later read yields.
fn creation_instant() -> DateTime<Utc> {
    let millis = Utc::now().timestamp_millis();
    DateTime::from_timestamp_millis(millis).unwrap_or_else(Utc::now)
}

fn read_error(source: rusqlite::Error) -> PlaceStoreError {
    PlaceStoreError::Read {
        source: Box::new(source),
    }
}

impl PlaceStore for SqlitePlaceStore {
    fn all(&self) -> Result<Vec<Place>, PlaceStoreError> {
        let mut statement = self.connection.prepare(SELECT_PLACES).map_err(read_error)?;
        let rows = statement.query_map([], place_from_row).map_err(read_error)?;
        let mut places = Vec::new();
        for row in rows {
            places.push(row.map_err(read_error)?);
        }
        Ok(places)
    }

    fn insert(&mut self, draft: &PlaceDraft) -> Result<Place, PlaceStoreError> {
        let created_at = creation_instant();
        self.connection
            .execute(
                INSERT_PLACE,
                params![
                    draft.name,
                    draft.description,
                    draft.location.x,
                    draft.location.y,
                    draft.category,
                    draft.marker_color,
                    false,
                    created_at.timestamp_millis(),
                ],
            )
            .map_err(|source| PlaceStoreError::Insert {
                name: draft.name.clone(),
                source: Box::new(source),
            })?;
        let id = self.connection.last_insert_rowid();
        Ok(Place::from_draft(id, draft.clone(), created_at))
    }

    fn update(&mut self, place: &Place) -> Result<(), PlaceStoreError> {
        let affected = self
            .connection
            .execute(
                "UPDATE places SET name = ?1, description = ?2, lon = ?3, lat = ?4, \
                 category = ?5, marker_color = ?6, favorite = ?7 WHERE id = ?8",
                params![
                    place.name,
                    place.description,
                    place.location.x,
                    place.location.y,
                    place.category,
                    place.marker_color,
                    place.is_favorite,
                    place.id,
                ],
            )
            .map_err(|source| PlaceStoreError::Update {
                id: place.id,
                source: Box::new(source),
            })?;
        if affected == 0 {
            return Err(PlaceStoreError::NotFound { id: place.id });
        }
        Ok(())
    }

    fn delete(&mut self, id: i64) -> Result<(), PlaceStoreError> {
        let affected = self
            .connection
            .execute("DELETE FROM places WHERE id = ?1", params![id])
            .map_err(|source| PlaceStoreError::Delete {
                id,
                source: Box::new(source),
            })?;
        if affected == 0 {
            return Err(PlaceStoreError::NotFound { id });
        }
        Ok(())
    }

    fn set_favorite(&mut self, id: i64, favorite: bool) -> Result<(), PlaceStoreError> {
        let affected = self
            .connection
            .execute(
                "UPDATE places SET favorite = ?1 WHERE id = ?2",
                params![favorite, id],
            )
            .map_err(|source| PlaceStoreError::SetFavorite {
                id,
                source: Box::new(source),
            })?;
        if affected == 0 {
            return Err(PlaceStoreError::NotFound { id });
        }
        Ok(())
    }

    fn insert_batch(&mut self, drafts: &[PlaceDraft]) -> Result<Vec<Place>, PlaceStoreError> {
        if drafts.is_empty() {
            return Ok(Vec::new());
        }
        let count = drafts.len();
        let batch_error = |source: rusqlite::Error| PlaceStoreError::Batch {
            count,
            source: Box::new(source),
        };

        let created_at = creation_instant();
        let transaction = self.connection.transaction().map_err(batch_error)?;
        let mut inserted = Vec::with_capacity(count);
        {
            let mut statement = transaction.prepare(INSERT_PLACE).map_err(batch_error)?;
            for draft in drafts {
                statement
                    .execute(params![
                        draft.name,
                        draft.description,
                        draft.location.x,
                        draft.location.y,
                        draft.category,
                        draft.marker_color,
                        false,
                        created_at.timestamp_millis(),
                    ])
                    .map_err(batch_error)?;
                inserted.push(Place::from_draft(
                    transaction.last_insert_rowid(),
                    draft.clone(),
                    created_at,
                ));
            }
        }
        transaction.commit().map_err(batch_error)?;
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

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

    #[fixture]
    fn store() -> SqlitePlaceStore {
        SqlitePlaceStore::open_in_memory().expect("open in-memory store")
    }

    #[rstest]
    fn insert_round_trips_all_fields(mut store: SqlitePlaceStore, parish: PlaceDraft) {
        let inserted = store.insert(&parish).expect("insert");
        let all = store.all().expect("read all");
        assert_eq!(all, vec![inserted.clone()]);
        assert_eq!(inserted.name, parish.name);
        assert_eq!(inserted.location, parish.location);
        assert!(!inserted.is_favorite);
    }

    #[rstest]
    fn update_missing_id_is_not_found(mut store: SqlitePlaceStore, parish: PlaceDraft) {
        let mut place = store.insert(&parish).expect("insert");
        place.id += 1;
        assert!(matches!(
            store.update(&place),
            Err(PlaceStoreError::NotFound { .. })
        ));
    }

    #[rstest]
    fn set_favorite_touches_only_the_flag(mut store: SqlitePlaceStore, parish: PlaceDraft) {
        let inserted = store.insert(&parish).expect("insert");
        store.set_favorite(inserted.id, true).expect("set flag");
        let stored = store.all().expect("read all").pop().expect("one place");
        assert!(stored.is_favorite);
        assert_eq!(stored.name, inserted.name);
        assert_eq!(stored.created_at, inserted.created_at);
    }

    #[rstest]
    fn batch_insert_is_all_or_nothing_on_success(mut store: SqlitePlaceStore, parish: PlaceDraft) {
        let drafts = vec![parish.clone(), parish];
        let inserted = store.insert_batch(&drafts).expect("insert batch");
        assert_eq!(inserted.len(), 2);
        assert_eq!(store.all().expect("read all"), inserted);
    }

    #[rstest]
    fn unrepresentable_timestamp_surfaces_as_read_error(store: SqlitePlaceStore) {
        store
            .connection
            .execute(
                "INSERT INTO places \
                 (name, description, lon, lat, category, marker_color, favorite, created_at) \
                 VALUES ('Parish', '', -100.9314, 21.1558, 'church', '#FF0000', 0, ?1)",
                params![i64::MAX],
            )
            .expect("insert raw row");

        let error = store.all().expect_err("corrupt timestamp should fail");
        assert!(matches!(error, PlaceStoreError::Read { .. }));
    }

    #[rstest]
    fn empty_batch_inserts_nothing(mut store: SqlitePlaceStore) {
        assert!(store.insert_batch(&[]).expect("empty batch").is_empty());
        assert!(store.all().expect("read all").is_empty());
    }
}
