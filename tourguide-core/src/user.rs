//! Users, their visit history and the rewards they have earned.
//!
//! A [`User`] owns an append-only history of [`VisitedLocation`] values and a
//! reward ledger holding at most one [`UserReward`] per attraction. Neither
//! collection ever shrinks.

use std::fmt;

use chrono::{DateTime, Utc};
use geo::Coord;
use thiserror::Error;
use uuid::Uuid;

use crate::{Attraction, AttractionId};

/// Opaque identifier for a [`User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct UserId(Uuid);

impl UserId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a random (version 4) identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Return the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A timestamped position recorded for a user.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisitedLocation {
    /// User the fix belongs to.
    pub user_id: UserId,
    /// Position (`x = longitude`, `y = latitude`).
    pub location: Coord<f64>,
    /// Instant the position was recorded.
    pub time_visited: DateTime<Utc>,
}

impl VisitedLocation {
    /// Construct a visit record.
    pub const fn new(user_id: UserId, location: Coord<f64>, time_visited: DateTime<Utc>) -> Self {
        Self {
            user_id,
            location,
            time_visited,
        }
    }
}

/// Points awarded for visiting an attraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserReward {
    /// The visit that qualified for the reward.
    pub visited_location: VisitedLocation,
    /// The rewarded attraction.
    pub attraction: Attraction,
    /// Point value granted.
    pub reward_points: u32,
}

impl UserReward {
    /// Pair a visit and an attraction with a point value.
    pub const fn new(
        visited_location: VisitedLocation,
        attraction: Attraction,
        reward_points: u32,
    ) -> Self {
        Self {
            visited_location,
            attraction,
            reward_points,
        }
    }
}

/// Trip preferences attached to a user profile.
///
/// The engine does not read these; they travel with the user so the
/// surrounding services can price trips and filter suggestions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserPreferences {
    /// Radius, in miles, within which the user wants attraction suggestions.
    pub attraction_proximity: f64,
    /// Trip length in days.
    pub trip_duration: u32,
    /// Tickets requested per attraction.
    pub ticket_quantity: u32,
    /// Adults travelling.
    pub number_of_adults: u32,
    /// Children travelling.
    pub number_of_children: u32,
}

impl Default for UserPreferences {
    fn default() -> Self {
        Self {
            attraction_proximity: f64::INFINITY,
            trip_duration: 1,
            ticket_quantity: 1,
            number_of_adults: 2,
            number_of_children: 0,
        }
    }
}

/// A traveller tracked by the system.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use geo::Coord;
/// use tourguide_core::{User, VisitedLocation};
///
/// let mut user = User::with_random_id("jon");
/// assert!(user.latest_location().is_none());
///
/// user.add_visited_location(VisitedLocation::new(user.id, Coord { x: 1.0, y: 2.0 }, Utc::now()));
/// assert_eq!(user.latest_location().map(|v| v.location), Some(Coord { x: 1.0, y: 2.0 }));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "UserRecord"))]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Login name.
    pub user_name: String,
    /// Contact phone number.
    pub phone_number: String,
    /// Contact email address.
    pub email_address: String,
    /// Trip preferences.
    pub preferences: UserPreferences,
    visited_locations: Vec<VisitedLocation>,
    rewards: Vec<UserReward>,
}

/// A serialized user whose ledger holds two rewards for one attraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("user ledger holds more than one reward for attraction {attraction}")]
pub struct DuplicateRewardError {
    /// Attraction rewarded twice.
    pub attraction: AttractionId,
}

/// Wire form of [`User`]; rewards are replayed through [`User::add_reward`].
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct UserRecord {
    id: UserId,
    user_name: String,
    phone_number: String,
    email_address: String,
    preferences: UserPreferences,
    visited_locations: Vec<VisitedLocation>,
    rewards: Vec<UserReward>,
}

#[cfg(feature = "serde")]
impl TryFrom<UserRecord> for User {
    type Error = DuplicateRewardError;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        let mut user = Self {
            id: record.id,
            user_name: record.user_name,
            phone_number: record.phone_number,
            email_address: record.email_address,
            preferences: record.preferences,
            visited_locations: record.visited_locations,
            rewards: Vec::with_capacity(record.rewards.len()),
        };
        for reward in record.rewards {
            let attraction = reward.attraction.id;
            if !user.add_reward(reward) {
                return Err(DuplicateRewardError { attraction });
            }
        }
        Ok(user)
    }
}

impl User {
    /// Construct a user with empty history and no rewards.
    pub fn new(
        id: UserId,
        user_name: impl Into<String>,
        phone_number: impl Into<String>,
        email_address: impl Into<String>,
    ) -> Self {
        Self {
            id,
            user_name: user_name.into(),
            phone_number: phone_number.into(),
            email_address: email_address.into(),
            preferences: UserPreferences::default(),
            visited_locations: Vec::new(),
            rewards: Vec::new(),
        }
    }

    /// Construct a user with a random identifier and blank contact details.
    pub fn with_random_id(user_name: impl Into<String>) -> Self {
        Self::new(UserId::random(), user_name, String::new(), String::new())
    }

    /// Visit history, oldest first.
    pub fn visited_locations(&self) -> &[VisitedLocation] {
        &self.visited_locations
    }

    /// Append a visit to the history.
    pub fn add_visited_location(&mut self, visit: VisitedLocation) {
        self.visited_locations.push(visit);
    }

    /// Most recent visit, if any.
    pub fn latest_location(&self) -> Option<&VisitedLocation> {
        self.visited_locations.last()
    }

    /// Earned rewards in the order they were granted.
    pub fn rewards(&self) -> &[UserReward] {
        &self.rewards
    }

    /// Whether the ledger already holds a reward for `attraction`.
    pub fn has_reward_for(&self, attraction: AttractionId) -> bool {
        self.rewards
            .iter()
            .any(|reward| reward.attraction.id == attraction)
    }

    /// Record a reward.
    ///
    /// Returns `false` and leaves the ledger untouched when the attraction has
    /// already been rewarded.
    ///
    /// # Examples
    /// ```
    /// use chrono::Utc;
    /// use geo::Coord;
    /// use tourguide_core::{Attraction, User, UserReward, VisitedLocation};
    ///
    /// let mut user = User::with_random_id("jon");
    /// let zoo = Attraction::with_random_id("Zoo", Coord { x: 0.0, y: 0.0 });
    /// let visit = VisitedLocation::new(user.id, zoo.location, Utc::now());
    ///
    /// assert!(user.add_reward(UserReward::new(visit.clone(), zoo.clone(), 10)));
    /// assert!(!user.add_reward(UserReward::new(visit, zoo, 20)));
    /// assert_eq!(user.total_reward_points(), 10);
    /// ```
    pub fn add_reward(&mut self, reward: UserReward) -> bool {
        if self.has_reward_for(reward.attraction.id) {
            return false;
        }
        self.rewards.push(reward);
        true
    }

    /// Sum of all reward points earned so far.
    pub fn total_reward_points(&self) -> u64 {
        self.rewards
            .iter()
            .map(|reward| u64::from(reward.reward_points))
            .sum()
    }
}
