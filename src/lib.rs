//! Facade crate for the TourGuide proximity reward engine.
//!
//! This crate re-exports the core domain types and exposes the simulated
//! collaborators behind the `simulation` feature flag.

#![forbid(unsafe_code)]

pub use tourguide_core::{
    ATTRACTION_PROXIMITY_RANGE_MILES, Attraction, AttractionCatalog, AttractionId,
    AttractionSource, BatchReport, BatchRewardProcessor, DEFAULT_NEARBY_LIMIT,
    DEFAULT_REWARD_RADIUS_MILES, LocationProvider, LocationTracker, NearbyAttraction,
    ProviderError, ProximityError, ProximityPolicy, RankedAttraction, RewardEngine, RewardError,
    RewardPointsProvider, TaskError, TrackError, User, UserId, UserOutcome, UserPreferences,
    UserReward, VisitedLocation, WorkerPool, WorkerPoolConfig, WorkerPoolError, distance_miles,
    nearby_attractions, nearest_k,
};

#[cfg(feature = "simulation")]
pub use tourguide_sim::{InternalUsers, SimulatedGps, SimulatedRewardCentral};
