//! Simulated collaborators for the TourGuide reward engine.
//!
//! [`SimulatedGps`] reports random positions and serves a fixed catalogue of
//! North American attractions, [`SimulatedRewardCentral`] prices rewards with
//! random point values, and [`InternalUsers`] seeds test users with a short
//! visit history. Every generator is driven by a seeded
//! [`ChaCha8Rng`](rand_chacha::ChaCha8Rng), so runs are reproducible.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use tourguide_core::{AttractionCatalog, RewardEngine};
//! use tourguide_sim::{InternalUsers, SimulatedGps, SimulatedRewardCentral};
//!
//! let gps = SimulatedGps::new(7);
//! let catalog = Arc::new(AttractionCatalog::load(&gps)?);
//! let engine = RewardEngine::new(catalog, SimulatedRewardCentral::new(7));
//!
//! let mut users = InternalUsers::new(7).generate(2);
//! for user in &mut users {
//!     engine.calculate_rewards(user)?;
//! }
//! assert_eq!(users.len(), 2);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

pub mod gps;
pub mod reward_central;
pub mod users;

use rand::RngCore;
use uuid::{Builder, Uuid};

pub use gps::{LATITUDE_LIMIT, LONGITUDE_LIMIT, SimulatedGps};
pub use reward_central::{MAX_REWARD_POINTS, MIN_REWARD_POINTS, SimulatedRewardCentral};
pub use users::{
    INTERNAL_EMAIL_DOMAIN, INTERNAL_PHONE_NUMBER, InternalUsers, VISIT_HISTORY_DAYS,
    VISITS_PER_INTERNAL_USER,
};

/// Draw a version 4 UUID from `rng`.
pub(crate) fn random_uuid<R: RngCore + ?Sized>(rng: &mut R) -> Uuid {
    let mut bytes = [0_u8; 16];
    rng.fill_bytes(&mut bytes);
    Builder::from_random_bytes(bytes).into_uuid()
}
