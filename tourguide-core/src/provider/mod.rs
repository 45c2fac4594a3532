//! Boundaries to the external collaborators the engine depends on.
//!
//! Three collaborators feed the engine: a [`LocationProvider`] reporting a
//! user's current position, a [`RewardPointsProvider`] pricing each reward,
//! and an [`AttractionSource`] listing the attraction catalogue once at
//! start-up. Implementations must be `Send + Sync` so batch operations can
//! share them across worker threads.
//!
//! Failures are reported as [`ProviderError`] and are scoped to the single
//! user whose request failed.

mod error;
mod traits;

pub use error::ProviderError;
pub use traits::{AttractionSource, LocationProvider, RewardPointsProvider};
