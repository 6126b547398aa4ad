//! Domain types for tourist places.
//!
//! These models provide basic validation to keep downstream components
//! honest. Constructors return `Result` to surface invalid input early.

use chrono::{DateTime, Utc};
use geo::Coord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors returned when validating place data.
#[derive(Debug, Error, PartialEq)]
pub enum PlaceError {
    /// The display name was empty or whitespace.
    #[error("place name must not be empty")]
    EmptyName,
    /// The latitude fell outside the WGS84 range.
    #[error("latitude {latitude} is outside [-90, 90]")]
    InvalidLatitude {
        /// Latitude that failed validation, in degrees.
        latitude: f64,
    },
    /// The longitude fell outside the WGS84 range.
    #[error("longitude {longitude} is outside [-180, 180]")]
    InvalidLongitude {
        /// Longitude that failed validation, in degrees.
        longitude: f64,
    },
    /// The marker colour was not a `#RRGGBB` hex string.
    #[error("marker colour {color:?} is not a #RRGGBB hex string")]
    InvalidMarkerColor {
        /// Colour string that failed validation.
        color: String,
    },
}

/// A validated place that has not been persisted yet.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
/// The store assigns the identifier, creation timestamp, and the
/// initial favourite flag on insert.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use placemark_core::PlaceDraft;
///
/// # fn main() -> Result<(), placemark_core::PlaceError> {
/// let draft = PlaceDraft::new(
///     "Parroquia de Nuestra Señora de los Dolores",
///     "Iglesia del Grito de Independencia",
///     Coord { x: -100.9319, y: 21.1561 },
///     "iglesia",
///     "#C62828",
/// )?;
/// assert_eq!(draft.category, "iglesia");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceDraft {
    /// Display name shown on markers and list cards.
    pub name: String,
    /// Free-text description of the place.
    pub description: String,
    /// Geographic position (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
    /// Free-text classification such as "iglesia" or "museo".
    pub category: String,
    /// Marker colour as a `#RRGGBB` hex string.
    pub marker_color: String,
}

impl PlaceDraft {
    /// Validates and constructs a [`PlaceDraft`].
    ///
    /// # Errors
    /// Returns a [`PlaceError`] when the name is empty, a coordinate is
    /// outside its WGS84 range, or the colour is not `#RRGGBB`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        location: Coord<f64>,
        category: impl Into<String>,
        marker_color: impl Into<String>,
    ) -> Result<Self, PlaceError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PlaceError::EmptyName);
        }
        if !(-90.0..=90.0).contains(&location.y) {
            return Err(PlaceError::InvalidLatitude {
                latitude: location.y,
            });
        }
        if !(-180.0..=180.0).contains(&location.x) {
            return Err(PlaceError::InvalidLongitude {
                longitude: location.x,
            });
        }
        let marker_color = marker_color.into();
        if !is_hex_color(&marker_color) {
            return Err(PlaceError::InvalidMarkerColor {
                color: marker_color,
            });
        }
        Ok(Self {
            name,
            description: description.into(),
            location,
            category: category.into(),
            marker_color,
        })
    }
}

/// A persisted tourist place.
///
/// Identifiers are unique, assigned by the store on insert, and stable
/// for the lifetime of the record. The favourite flag starts out `false`
/// and is flipped through the repository's explicit toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Unique identifier assigned by the store.
    pub id: i64,
    /// Display name shown on markers and list cards.
    pub name: String,
    /// Free-text description of the place.
    pub description: String,
    /// Geographic position (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
    /// Free-text classification such as "iglesia" or "museo".
    pub category: String,
    /// Marker colour as a `#RRGGBB` hex string.
    pub marker_color: String,
    /// Whether the user marked the place as a favourite.
    pub is_favorite: bool,
    /// Creation timestamp, set once at insert time.
    pub created_at: DateTime<Utc>,
}

impl Place {
    /// Builds the stored record for a draft after the store assigned an id.
    pub fn from_draft(id: i64, draft: PlaceDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            location: draft.location,
            category: draft.category,
            marker_color: draft.marker_color,
            is_favorite: false,
            created_at,
        }
    }

    /// Case-insensitive search across name, description, and category.
    ///
    /// Mirrors the filter a map screen applies to its search box: a place
    /// matches when the query occurs in any of the three fields. An empty
    /// query matches everything.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use placemark_core::PlaceDraft;
    /// # use chrono::Utc;
    /// # use placemark_core::Place;
    ///
    /// # fn main() -> Result<(), placemark_core::PlaceError> {
    /// let draft = PlaceDraft::new(
    ///     "Museo Casa de Hidalgo",
    ///     "Casa del cura Hidalgo",
    ///     Coord { x: -100.9327, y: 21.1556 },
    ///     "museo",
    ///     "#1565C0",
    /// )?;
    /// let place = Place::from_draft(1, draft, Utc::now());
    /// assert!(place.matches("casa"));
    /// assert!(place.matches("MUSEO"));
    /// assert!(!place.matches("restaurante"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.category.to_lowercase().contains(&query)
    }
}

fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn draft(name: &str, lat: f64, lon: f64, color: &str) -> Result<PlaceDraft, PlaceError> {
        PlaceDraft::new(name, "", Coord { x: lon, y: lat }, "museo", color)
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn draft_rejects_empty_name(#[case] name: &str) {
        assert_eq!(draft(name, 0.0, 0.0, "#FF0000"), Err(PlaceError::EmptyName));
    }

    #[rstest]
    #[case(90.0001)]
    #[case(-90.0001)]
    fn draft_rejects_out_of_range_latitude(#[case] lat: f64) {
        assert!(matches!(
            draft("Parish", lat, 0.0, "#FF0000"),
            Err(PlaceError::InvalidLatitude { .. })
        ));
    }

    #[rstest]
    #[case(180.0001)]
    #[case(-180.0001)]
    fn draft_rejects_out_of_range_longitude(#[case] lon: f64) {
        assert!(matches!(
            draft("Parish", 0.0, lon, "#FF0000"),
            Err(PlaceError::InvalidLongitude { .. })
        ));
    }

    #[rstest]
    #[case(-90.0, -180.0)]
    #[case(90.0, 180.0)]
    #[case(21.1558, -100.9314)]
    fn draft_accepts_boundary_coordinates(#[case] lat: f64, #[case] lon: f64) {
        assert!(draft("Parish", lat, lon, "#FF0000").is_ok());
    }

    #[rstest]
    #[case("FF0000")] // missing hash
    #[case("#FF000")] // too short
    #[case("#FF00000")] // too long
    #[case("#GG0000")] // not hex
    fn draft_rejects_malformed_colour(#[case] color: &str) {
        assert!(matches!(
            draft("Parish", 0.0, 0.0, color),
            Err(PlaceError::InvalidMarkerColor { .. })
        ));
    }

    #[rstest]
    #[case("#ff0000")]
    #[case("#A1b2C3")]
    fn draft_accepts_mixed_case_hex(#[case] color: &str) {
        assert!(draft("Parish", 0.0, 0.0, color).is_ok());
    }

    #[rstest]
    fn from_draft_starts_unfavourited() {
        let draft = draft("Parish", 21.1558, -100.9314, "#FF0000").expect("valid draft");
        let place = Place::from_draft(7, draft, Utc::now());
        assert_eq!(place.id, 7);
        assert!(!place.is_favorite);
    }

    #[rstest]
    #[case("parroquia", true)]
    #[case("IGLESIA", true)]
    #[case("grito", true)] // description only
    #[case("", true)]
    #[case("museo", false)]
    fn matches_searches_name_description_and_category(#[case] query: &str, #[case] expected: bool) {
        let draft = PlaceDraft::new(
            "Parroquia de Nuestra Señora de los Dolores",
            "Iglesia del Grito de Independencia",
            Coord {
                x: -100.9319,
                y: 21.1561,
            },
            "iglesia",
            "#C62828",
        )
        .expect("valid draft");
        let place = Place::from_draft(1, draft, Utc::now());
        assert_eq!(place.matches(query), expected);
    }
}
