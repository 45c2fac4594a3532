//! Location tracking: fetch a fix, record it, then recompute rewards.

use thiserror::Error;

use crate::batch::log_summary;
use crate::{
    BatchReport, LocationProvider, ProviderError, RewardEngine, RewardError,
    RewardPointsProvider, TaskError, User, UserId, VisitedLocation, WorkerPool,
    WorkerPoolConfig, WorkerPoolError,
};

/// Errors returned by [`LocationTracker::track`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackError {
    /// The location provider failed; nothing was recorded.
    #[error("failed to fetch current location: {0}")]
    Location(#[from] ProviderError),
    /// The provider returned a visit belonging to another user; nothing was
    /// recorded.
    #[error("location provider returned a visit for user {reported} when asked for {user}")]
    ForeignVisit {
        /// User being tracked.
        user: UserId,
        /// Owner stamped on the returned visit.
        reported: UserId,
    },
    /// The visit was recorded but reward recomputation failed.
    #[error("visit recorded but rewards could not be updated: {0}")]
    Reward(#[source] RewardError),
}

/// Records fresh locations for users and keeps their rewards current.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use geo::Coord;
/// use tourguide_core::test_support::{ConstantPoints, FixedLocationProvider};
/// use tourguide_core::{
///     Attraction, AttractionCatalog, LocationTracker, RewardEngine, User, WorkerPoolConfig,
/// };
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let pier = Attraction::with_random_id("Pier", Coord { x: 1.0, y: 1.0 });
/// let engine = RewardEngine::new(Arc::new(AttractionCatalog::new(vec![pier])), ConstantPoints::new(9));
/// let gps = FixedLocationProvider::new(Coord { x: 1.0, y: 1.0 });
/// let tracker = LocationTracker::new(gps, &engine, WorkerPoolConfig::tracking_default())?;
///
/// let mut user = User::with_random_id("jon");
/// let visit = tracker.track(&mut user)?;
/// assert_eq!(user.latest_location(), Some(&visit));
/// assert_eq!(user.total_reward_points(), 9);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct LocationTracker<'e, L, P> {
    locations: L,
    engine: &'e RewardEngine<P>,
    pool: WorkerPool,
}

impl<'e, L, P> LocationTracker<'e, L, P>
where
    L: LocationProvider,
    P: RewardPointsProvider,
{
    /// Build a tracker with its own pool.
    pub fn new(
        locations: L,
        engine: &'e RewardEngine<P>,
        config: WorkerPoolConfig,
    ) -> Result<Self, WorkerPoolError> {
        let pool = WorkerPool::new("tracking", config)?;
        Ok(Self::with_pool(locations, engine, pool))
    }

    /// Build a tracker around an existing pool.
    pub const fn with_pool(locations: L, engine: &'e RewardEngine<P>, pool: WorkerPool) -> Self {
        Self {
            locations,
            engine,
            pool,
        }
    }

    /// The pool used by [`Self::track_all`].
    pub const fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Fetch `user`'s current location, record it and recalculate rewards.
    ///
    /// The visit is returned once rewards have been updated. A location
    /// failure, or a visit stamped with another user's id, leaves the user
    /// untouched; a reward failure keeps the new visit.
    pub fn track(&self, user: &mut User) -> Result<VisitedLocation, TrackError> {
        let visit = self.locations.current_location(user.id)?;
        if visit.user_id != user.id {
            return Err(TrackError::ForeignVisit {
                user: user.id,
                reported: visit.user_id,
            });
        }
        user.add_visited_location(visit.clone());
        log::debug!("recorded visit for user {} at {:?}", user.id, visit.location);
        self.engine
            .calculate_rewards(user)
            .map(|_| visit)
            .map_err(TrackError::Reward)
    }

    /// Track every user on the pool and wait for all tasks.
    pub fn track_all(&self, users: &mut [User]) -> BatchReport<VisitedLocation> {
        let report = self
            .pool
            .run(users, |user| self.track(user).map_err(TaskError::from));
        log_summary("tracking", &report);
        report
    }

    /// Return the user's latest recorded visit, tracking one if the history
    /// is empty.
    pub fn current_location(&self, user: &mut User) -> Result<VisitedLocation, TrackError> {
        user.latest_location()
            .cloned()
            .map_or_else(|| self.track(user), Ok)
    }
}
