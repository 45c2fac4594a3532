//! Core domain types and the proximity reward engine for TourGuide.
//!
//! The crate models attractions, users and their visit history, and the
//! engine that awards points when a visit falls close to an attraction. The
//! external collaborators (location fixes, point values and the attraction
//! catalogue) are abstracted behind the traits in [`provider`].
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use chrono::Utc;
//! use geo::Coord;
//! use tourguide_core::test_support::ConstantPoints;
//! use tourguide_core::{Attraction, AttractionCatalog, RewardEngine, User, VisitedLocation};
//!
//! # fn main() -> Result<(), tourguide_core::RewardError> {
//! let museum = Attraction::with_random_id("Museum", Coord { x: 0.0, y: 0.0 });
//! let catalog = Arc::new(AttractionCatalog::new(vec![museum]));
//! let engine = RewardEngine::new(catalog, ConstantPoints::new(100));
//!
//! let mut user = User::with_random_id("jon");
//! let visit = VisitedLocation::new(user.id, Coord { x: 0.0, y: 0.0 }, Utc::now());
//! user.add_visited_location(visit);
//!
//! assert_eq!(engine.calculate_rewards(&mut user)?, 1);
//! assert_eq!(user.total_reward_points(), 100);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod attraction;
pub mod batch;
pub mod catalog;
pub mod geodistance;
pub mod nearest;
pub mod provider;
pub mod proximity;
pub mod rewards;
#[doc(hidden)]
pub mod test_support;
pub mod tracker;
pub mod user;

pub use attraction::{Attraction, AttractionId};
pub use batch::{
    BatchReport, BatchRewardProcessor, TaskError, UserOutcome, WorkerPool, WorkerPoolConfig,
    WorkerPoolError,
};
pub use catalog::AttractionCatalog;
pub use geodistance::{STATUTE_MILES_PER_NAUTICAL_MILE, distance_miles};
pub use nearest::{
    DEFAULT_NEARBY_LIMIT, NearbyAttraction, RankedAttraction, nearby_attractions, nearest_k,
};
pub use provider::{AttractionSource, LocationProvider, ProviderError, RewardPointsProvider};
pub use proximity::{
    ATTRACTION_PROXIMITY_RANGE_MILES, DEFAULT_REWARD_RADIUS_MILES, ProximityError,
    ProximityPolicy,
};
pub use rewards::{RewardEngine, RewardError};
pub use tracker::{LocationTracker, TrackError};
pub use user::{
    DuplicateRewardError, User, UserId, UserPreferences, UserReward, VisitedLocation,
};
