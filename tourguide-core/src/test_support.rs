//! In-memory collaborator doubles used by unit, behaviour and doc tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::Utc;
use geo::Coord;

use crate::{
    Attraction, AttractionId, AttractionSource, LocationProvider, ProviderError,
    RewardPointsProvider, UserId, VisitedLocation,
};

/// Point provider returning the same value for every request.
#[derive(Debug, Clone, Copy)]
pub struct ConstantPoints {
    points: u32,
}

impl ConstantPoints {
    /// Create a provider returning `points`.
    pub const fn new(points: u32) -> Self {
        Self { points }
    }
}

impl RewardPointsProvider for ConstantPoints {
    fn points_for(&self, _attraction: AttractionId, _user: UserId) -> Result<u32, ProviderError> {
        Ok(self.points)
    }
}

/// Point provider that always fails.
#[derive(Debug, Clone)]
pub struct FailingPoints {
    message: String,
}

impl FailingPoints {
    /// Create a provider failing with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl RewardPointsProvider for FailingPoints {
    fn points_for(&self, _attraction: AttractionId, _user: UserId) -> Result<u32, ProviderError> {
        Err(ProviderError::unavailable("reward points", self.message.clone()))
    }
}

/// Point provider that fails for selected attractions or users and returns a
/// constant otherwise.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPoints {
    points: u32,
    failing_attractions: HashSet<AttractionId>,
    failing_users: HashSet<UserId>,
}

impl ScriptedPoints {
    /// Fail for `attraction`, return `points` for everything else.
    pub fn failing_for(attraction: AttractionId, points: u32) -> Self {
        Self {
            points,
            failing_attractions: HashSet::from([attraction]),
            failing_users: HashSet::new(),
        }
    }

    /// Fail for every request made on behalf of the given users.
    pub fn failing_for_users<I>(users: I, points: u32) -> Self
    where
        I: IntoIterator<Item = UserId>,
    {
        Self {
            points,
            failing_attractions: HashSet::new(),
            failing_users: users.into_iter().collect(),
        }
    }
}

impl RewardPointsProvider for ScriptedPoints {
    fn points_for(&self, attraction: AttractionId, user: UserId) -> Result<u32, ProviderError> {
        if self.failing_attractions.contains(&attraction) || self.failing_users.contains(&user) {
            return Err(ProviderError::unavailable(
                "reward points",
                format!("scripted failure for {attraction}"),
            ));
        }
        Ok(self.points)
    }
}

/// Point provider that panics for the given users.
#[derive(Debug, Clone, Default)]
pub struct PanickingPoints {
    users: HashSet<UserId>,
    points: u32,
}

impl PanickingPoints {
    /// Panic for `users`, return `points` otherwise.
    pub fn for_users<I>(users: I, points: u32) -> Self
    where
        I: IntoIterator<Item = UserId>,
    {
        Self {
            users: users.into_iter().collect(),
            points,
        }
    }
}

impl RewardPointsProvider for PanickingPoints {
    #[expect(clippy::panic, reason = "exercises panic isolation in the worker pool")]
    fn points_for(&self, _attraction: AttractionId, user: UserId) -> Result<u32, ProviderError> {
        if self.users.contains(&user) {
            panic!("point oracle crashed for user {user}");
        }
        Ok(self.points)
    }
}

/// Location provider reporting the same coordinate for every user.
#[derive(Debug)]
pub struct FixedLocationProvider {
    location: Coord<f64>,
    failing_users: HashSet<UserId>,
    reported_as: Option<UserId>,
    calls: AtomicUsize,
}

impl FixedLocationProvider {
    /// Report `location` for every user.
    pub fn new(location: Coord<f64>) -> Self {
        Self {
            location,
            failing_users: HashSet::new(),
            reported_as: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Stamp every visit with `user` instead of the requested user.
    #[must_use]
    pub const fn reporting_as(mut self, user: UserId) -> Self {
        self.reported_as = Some(user);
        self
    }

    /// Fail for the given users.
    #[must_use]
    pub fn failing_for<I>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = UserId>,
    {
        self.failing_users.extend(users);
        self
    }

    /// Number of location requests served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LocationProvider for FixedLocationProvider {
    fn current_location(&self, user: UserId) -> Result<VisitedLocation, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_users.contains(&user) {
            return Err(ProviderError::UnknownUser { user });
        }
        let owner = self.reported_as.unwrap_or(user);
        Ok(VisitedLocation::new(owner, self.location, Utc::now()))
    }
}

/// Attraction source returning a fixed list and counting calls.
#[derive(Debug, Default)]
pub struct StaticAttractionSource {
    attractions: Vec<Attraction>,
    failure: Option<String>,
    calls: AtomicUsize,
}

impl StaticAttractionSource {
    /// Serve `attractions`.
    pub fn new(attractions: Vec<Attraction>) -> Self {
        Self {
            attractions,
            failure: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Fail every call with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            attractions: Vec::new(),
            failure: Some(message.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times the catalogue was listed.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl AttractionSource for StaticAttractionSource {
    fn list_attractions(&self) -> Result<Vec<Attraction>, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(ProviderError::unavailable("attraction catalogue", message)),
            None => Ok(self.attractions.clone()),
        }
    }
}
