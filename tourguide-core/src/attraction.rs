//! Attractions: named points of interest with fixed coordinates.

use std::fmt;

use geo::Coord;
use uuid::Uuid;

/// Opaque identifier for an [`Attraction`].
///
/// Identifiers are totally ordered so they can break ties between
/// equidistant attractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct AttractionId(Uuid);

impl AttractionId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a random (version 4) identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AttractionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A point of interest that can earn a visitor reward points.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use tourguide_core::{Attraction, AttractionId};
///
/// let id = AttractionId::random();
/// let castle = Attraction::new(id, "Cinderella Castle", Coord { x: -81.5812, y: 28.419411 });
///
/// assert_eq!(castle.id, id);
/// assert_eq!(castle.name, "Cinderella Castle");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attraction {
    /// Unique identifier.
    pub id: AttractionId,
    /// Display name.
    pub name: String,
    /// Geospatial position.
    pub location: Coord<f64>,
}

impl Attraction {
    /// Construct an attraction from its parts.
    pub fn new(id: AttractionId, name: impl Into<String>, location: Coord<f64>) -> Self {
        Self {
            id,
            name: name.into(),
            location,
        }
    }

    /// Construct an attraction with a freshly generated identifier.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use tourguide_core::Attraction;
    ///
    /// let a = Attraction::with_random_id("Bronx Zoo", Coord { x: -73.872971, y: 40.852905 });
    /// let b = Attraction::with_random_id("Bronx Zoo", Coord { x: -73.872971, y: 40.852905 });
    /// assert_ne!(a.id, b.id);
    /// ```
    pub fn with_random_id(name: impl Into<String>, location: Coord<f64>) -> Self {
        Self::new(AttractionId::random(), name, location)
    }
}
