//! The immutable attraction catalogue.
//!
//! The catalogue is fetched once from an [`AttractionSource`] and then shared
//! read-only, typically behind an `Arc`, by every engine component. There is
//! no refresh path.

use crate::{Attraction, AttractionId, AttractionSource, ProviderError};

/// Read-only list of attractions, in source order.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use tourguide_core::{Attraction, AttractionCatalog};
///
/// let zoo = Attraction::with_random_id("Zoo", Coord { x: 0.0, y: 0.0 });
/// let catalog = AttractionCatalog::new(vec![zoo.clone()]);
///
/// assert_eq!(catalog.len(), 1);
/// assert_eq!(catalog.get(zoo.id), Some(&zoo));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttractionCatalog {
    attractions: Vec<Attraction>,
}

impl AttractionCatalog {
    /// Wrap an already-fetched list of attractions.
    pub const fn new(attractions: Vec<Attraction>) -> Self {
        Self { attractions }
    }

    /// Fetch the catalogue from `source`.
    ///
    /// [`AttractionSource::list_attractions`] is called exactly once.
    pub fn load<S>(source: &S) -> Result<Self, ProviderError>
    where
        S: AttractionSource + ?Sized,
    {
        let attractions = source.list_attractions()?;
        log::debug!("loaded {} attractions into the catalogue", attractions.len());
        Ok(Self::new(attractions))
    }

    /// All attractions in source order.
    pub fn all(&self) -> &[Attraction] {
        &self.attractions
    }

    /// Iterate over the attractions in source order.
    pub fn iter(&self) -> std::slice::Iter<'_, Attraction> {
        self.attractions.iter()
    }

    /// Look up an attraction by identifier.
    pub fn get(&self, id: AttractionId) -> Option<&Attraction> {
        self.attractions.iter().find(|attraction| attraction.id == id)
    }

    /// Number of attractions.
    pub const fn len(&self) -> usize {
        self.attractions.len()
    }

    /// Whether the catalogue holds no attractions.
    pub const fn is_empty(&self) -> bool {
        self.attractions.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttractionCatalog {
    type Item = &'a Attraction;
    type IntoIter = std::slice::Iter<'a, Attraction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
