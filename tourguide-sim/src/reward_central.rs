//! Simulated reward-points oracle.

use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tourguide_core::{AttractionId, ProviderError, RewardPointsProvider, UserId};

/// Smallest point value returned.
pub const MIN_REWARD_POINTS: u32 = 1;

/// Upper bound (exclusive) of the point values returned.
pub const MAX_REWARD_POINTS: u32 = 1000;

/// Point provider returning uniformly random values in
/// `MIN_REWARD_POINTS..MAX_REWARD_POINTS`.
///
/// # Examples
/// ```
/// use tourguide_core::{AttractionId, RewardPointsProvider, UserId};
/// use tourguide_sim::{MAX_REWARD_POINTS, SimulatedRewardCentral};
///
/// let central = SimulatedRewardCentral::new(11);
/// let points = central.points_for(AttractionId::random(), UserId::random())?;
/// assert!(points < MAX_REWARD_POINTS);
/// # Ok::<(), tourguide_core::ProviderError>(())
/// ```
#[derive(Debug)]
pub struct SimulatedRewardCentral {
    rng: Mutex<ChaCha8Rng>,
    latency: Duration,
}

impl SimulatedRewardCentral {
    /// Build an oracle seeded with `seed` and no artificial latency.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)),
            latency: Duration::ZERO,
        }
    }

    /// Sleep for `latency` before answering each request.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

impl RewardPointsProvider for SimulatedRewardCentral {
    fn points_for(&self, _attraction: AttractionId, _user: UserId) -> Result<u32, ProviderError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(rng.gen_range(MIN_REWARD_POINTS..MAX_REWARD_POINTS))
    }
}
