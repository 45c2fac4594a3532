//! Distance thresholds deciding reward eligibility and "nearby" checks.

use thiserror::Error;

/// Default reward radius in statute miles.
pub const DEFAULT_REWARD_RADIUS_MILES: f64 = 10.0;

/// Range, in statute miles, within which an attraction counts as nearby.
pub const ATTRACTION_PROXIMITY_RANGE_MILES: f64 = 200.0;

/// Errors returned by [`ProximityPolicy::set_reward_radius`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ProximityError {
    /// The radius was negative or not a number.
    #[error("reward radius must be a non-negative number of miles, got {radius}")]
    InvalidRadius {
        /// Rejected radius.
        radius: f64,
    },
}

/// Reward and proximity thresholds.
///
/// The reward radius is adjustable; the attraction proximity range is fixed.
/// Both comparisons are strict, so a radius of `0.0` never matches and
/// `f64::INFINITY` matches every finite distance.
///
/// # Examples
/// ```
/// use tourguide_core::ProximityPolicy;
///
/// let mut policy = ProximityPolicy::default();
/// assert!(policy.is_near_for_reward(9.9));
/// assert!(!policy.is_near_for_reward(10.0));
///
/// policy.set_reward_radius(f64::INFINITY)?;
/// assert!(policy.is_near_for_reward(12_000.0));
///
/// policy.reset_reward_radius();
/// assert_eq!(policy.reward_radius(), 10.0);
/// # Ok::<(), tourguide_core::ProximityError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityPolicy {
    reward_radius: f64,
    attraction_proximity_range: f64,
}

impl Default for ProximityPolicy {
    fn default() -> Self {
        Self {
            reward_radius: DEFAULT_REWARD_RADIUS_MILES,
            attraction_proximity_range: ATTRACTION_PROXIMITY_RANGE_MILES,
        }
    }
}

impl ProximityPolicy {
    /// Construct a policy with a custom reward radius.
    pub fn with_reward_radius(radius: f64) -> Result<Self, ProximityError> {
        let mut policy = Self::default();
        policy.set_reward_radius(radius)?;
        Ok(policy)
    }

    /// Current reward radius in miles.
    pub const fn reward_radius(&self) -> f64 {
        self.reward_radius
    }

    /// Fixed attraction proximity range in miles.
    pub const fn attraction_proximity_range(&self) -> f64 {
        self.attraction_proximity_range
    }

    /// Replace the reward radius.
    pub fn set_reward_radius(&mut self, radius: f64) -> Result<(), ProximityError> {
        if radius.is_nan() || radius < 0.0 {
            return Err(ProximityError::InvalidRadius { radius });
        }
        self.reward_radius = radius;
        Ok(())
    }

    /// Restore [`DEFAULT_REWARD_RADIUS_MILES`].
    pub const fn reset_reward_radius(&mut self) {
        self.reward_radius = DEFAULT_REWARD_RADIUS_MILES;
    }

    /// Whether a visit `distance` miles away qualifies for a reward.
    pub fn is_near_for_reward(&self, distance: f64) -> bool {
        distance < self.reward_radius
    }

    /// Whether an attraction `distance` miles away counts as nearby.
    pub fn is_within_range(&self, distance: f64) -> bool {
        distance < self.attraction_proximity_range
    }
}
