//! Collaborator traits for location fixes, point values and the catalogue.

use crate::{Attraction, AttractionId, UserId, VisitedLocation};

use super::error::ProviderError;

/// Report where a user currently is.
///
/// Each call is expected to return a fresh reading.
///
/// # Examples
///
/// ```rust
/// use chrono::Utc;
/// use geo::Coord;
/// use tourguide_core::{LocationProvider, ProviderError, UserId, VisitedLocation};
///
/// struct Origin;
///
/// impl LocationProvider for Origin {
///     fn current_location(&self, user: UserId) -> Result<VisitedLocation, ProviderError> {
///         Ok(VisitedLocation::new(user, Coord { x: 0.0, y: 0.0 }, Utc::now()))
///     }
/// }
///
/// let user = UserId::random();
/// let visit = Origin.current_location(user)?;
/// assert_eq!(visit.user_id, user);
/// # Ok::<(), ProviderError>(())
/// ```
pub trait LocationProvider: Send + Sync {
    /// Return the current position of `user`.
    fn current_location(&self, user: UserId) -> Result<VisitedLocation, ProviderError>;
}

/// Price a reward for a user visiting an attraction.
///
/// The lookup may be remote and slow; it must not mutate engine state.
pub trait RewardPointsProvider: Send + Sync {
    /// Return the points `user` earns for visiting `attraction`.
    fn points_for(&self, attraction: AttractionId, user: UserId) -> Result<u32, ProviderError>;
}

/// List the attraction catalogue.
///
/// Called once when an [`AttractionCatalog`](crate::AttractionCatalog) is
/// loaded; the order of the returned attractions is preserved.
pub trait AttractionSource {
    /// Return every known attraction.
    fn list_attractions(&self) -> Result<Vec<Attraction>, ProviderError>;
}

impl<T: LocationProvider + ?Sized> LocationProvider for &T {
    fn current_location(&self, user: UserId) -> Result<VisitedLocation, ProviderError> {
        (**self).current_location(user)
    }
}

impl<T: RewardPointsProvider + ?Sized> RewardPointsProvider for &T {
    fn points_for(&self, attraction: AttractionId, user: UserId) -> Result<u32, ProviderError> {
        (**self).points_for(attraction, user)
    }
}

impl<T: RewardPointsProvider + ?Sized> RewardPointsProvider for std::sync::Arc<T> {
    fn points_for(&self, attraction: AttractionId, user: UserId) -> Result<u32, ProviderError> {
        (**self).points_for(attraction, user)
    }
}

impl<T: LocationProvider + ?Sized> LocationProvider for std::sync::Arc<T> {
    fn current_location(&self, user: UserId) -> Result<VisitedLocation, ProviderError> {
        (**self).current_location(user)
    }
}
