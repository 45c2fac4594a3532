//! Per-user reward computation.
//!
//! [`RewardEngine`] scans a user's visit history against the shared
//! [`AttractionCatalog`] and grants at most one reward per attraction. Rewards
//! are only ever added: narrowing the reward radius never revokes anything,
//! while widening it and recomputing can grant more.

use std::collections::HashSet;
use std::sync::Arc;

use geo::Coord;
use thiserror::Error;

use crate::nearest::nearby_attractions;
use crate::{
    Attraction, AttractionCatalog, AttractionId, NearbyAttraction, ProviderError,
    ProximityError, ProximityPolicy, RewardPointsProvider, User, UserId, UserReward,
    distance_miles,
};

/// Errors returned by [`RewardEngine::calculate_rewards`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewardError {
    /// The point-value provider failed while pricing a reward.
    ///
    /// Rewards granted earlier in the same pass are kept.
    #[error("failed to fetch reward points for attraction {attraction} and user {user}: {source}")]
    Points {
        /// Attraction being priced.
        attraction: AttractionId,
        /// User being rewarded.
        user: UserId,
        /// Collaborator failure.
        #[source]
        source: ProviderError,
    },
}

/// Grants rewards for visits close to catalogued attractions.
///
/// The engine owns its [`ProximityPolicy`]. Changing the reward radius takes
/// `&mut self`, so a change can never interleave with a batch that borrows the
/// engine.
///
/// `calculate_rewards` takes `&mut User`; two concurrent passes over the same
/// user are therefore impossible.
#[derive(Debug)]
pub struct RewardEngine<P> {
    catalog: Arc<AttractionCatalog>,
    points: P,
    policy: ProximityPolicy,
}

impl<P> RewardEngine<P>
where
    P: RewardPointsProvider,
{
    /// Construct an engine with the default [`ProximityPolicy`].
    pub fn new(catalog: Arc<AttractionCatalog>, points: P) -> Self {
        Self::with_policy(catalog, points, ProximityPolicy::default())
    }

    /// Construct an engine with an explicit policy.
    pub const fn with_policy(
        catalog: Arc<AttractionCatalog>,
        points: P,
        policy: ProximityPolicy,
    ) -> Self {
        Self {
            catalog,
            points,
            policy,
        }
    }

    /// Shared attraction catalogue.
    pub fn catalog(&self) -> &Arc<AttractionCatalog> {
        &self.catalog
    }

    /// Active proximity policy.
    pub const fn policy(&self) -> &ProximityPolicy {
        &self.policy
    }

    /// Replace the reward radius for all subsequent computations.
    pub fn set_reward_radius(&mut self, radius: f64) -> Result<(), ProximityError> {
        self.policy.set_reward_radius(radius)
    }

    /// Restore the default reward radius.
    pub const fn reset_reward_radius(&mut self) {
        self.policy.reset_reward_radius();
    }

    /// Whether `attraction` lies within the attraction proximity range of
    /// `location`.
    pub fn is_within_attraction_proximity(
        &self,
        attraction: &Attraction,
        location: Coord<f64>,
    ) -> bool {
        self.policy
            .is_within_range(distance_miles(attraction.location, location))
    }

    /// Fetch the point value of `attraction` for `user`.
    pub fn reward_points(&self, attraction: &Attraction, user: UserId) -> Result<u32, RewardError> {
        self.points
            .points_for(attraction.id, user)
            .map_err(|source| RewardError::Points {
                attraction: attraction.id,
                user,
                source,
            })
    }

    /// Grant rewards for every visit close to a not-yet-rewarded attraction.
    ///
    /// Visits are scanned oldest first, and attractions in catalogue order,
    /// so the order in which rewards are granted is deterministic. Returns
    /// the number of rewards added by this pass.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use chrono::Utc;
    /// use geo::Coord;
    /// use tourguide_core::test_support::ConstantPoints;
    /// use tourguide_core::{Attraction, AttractionCatalog, RewardEngine, User, VisitedLocation};
    ///
    /// # fn main() -> Result<(), tourguide_core::RewardError> {
    /// let zoo = Attraction::with_random_id("Zoo", Coord { x: 0.0, y: 0.0 });
    /// let engine = RewardEngine::new(
    ///     Arc::new(AttractionCatalog::new(vec![zoo])),
    ///     ConstantPoints::new(5),
    /// );
    /// let mut user = User::with_random_id("jon");
    /// user.add_visited_location(VisitedLocation::new(user.id, Coord { x: 0.0, y: 0.0 }, Utc::now()));
    ///
    /// assert_eq!(engine.calculate_rewards(&mut user)?, 1);
    /// assert_eq!(engine.calculate_rewards(&mut user)?, 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn calculate_rewards(&self, user: &mut User) -> Result<usize, RewardError> {
        let mut rewarded: HashSet<AttractionId> = user
            .rewards()
            .iter()
            .map(|reward| reward.attraction.id)
            .collect();
        let mut pending = Vec::new();
        let mut failure = None;

        'visits: for visit in user.visited_locations() {
            for attraction in self.catalog.iter() {
                if rewarded.contains(&attraction.id) {
                    continue;
                }
                let distance = distance_miles(attraction.location, visit.location);
                if !self.policy.is_near_for_reward(distance) {
                    continue;
                }
                match self.reward_points(attraction, user.id) {
                    Ok(points) => {
                        rewarded.insert(attraction.id);
                        pending.push(UserReward::new(visit.clone(), attraction.clone(), points));
                    }
                    Err(err) => {
                        failure = Some(err);
                        break 'visits;
                    }
                }
            }
        }

        let granted = commit(user, pending);
        if let Some(err) = failure {
            log::warn!(
                "reward pass for user {} stopped after {granted} new rewards: {err}",
                user.id
            );
            return Err(err);
        }
        if granted > 0 {
            log::debug!("granted {granted} rewards to user {}", user.id);
        }
        Ok(granted)
    }

    /// Return the `k` attractions nearest to `location`, annotated with the
    /// user's total reward points.
    pub fn nearby_attractions(
        &self,
        location: Coord<f64>,
        k: usize,
        user: &User,
    ) -> Vec<NearbyAttraction> {
        nearby_attractions(&self.catalog, location, k, user)
    }
}

fn commit(user: &mut User, pending: Vec<UserReward>) -> usize {
    pending
        .into_iter()
        .map(|reward| user.add_reward(reward))
        .filter(|added| *added)
        .count()
}
