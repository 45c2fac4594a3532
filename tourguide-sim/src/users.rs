//! Internal test users with a short random visit history.

use chrono::{DateTime, TimeDelta, Utc};
use geo::Coord;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tourguide_core::{User, UserId, VisitedLocation};

use crate::random_uuid;
use crate::{LATITUDE_LIMIT, LONGITUDE_LIMIT};

/// Phone number given to every internal user.
pub const INTERNAL_PHONE_NUMBER: &str = "000";

/// Email domain of internal users.
pub const INTERNAL_EMAIL_DOMAIN: &str = "tourGuide.com";

/// Visits recorded for each generated user.
pub const VISITS_PER_INTERNAL_USER: usize = 3;

/// Visits are dated within this many days before generation.
pub const VISIT_HISTORY_DAYS: i64 = 30;

/// Deterministic generator of internal users.
///
/// # Examples
/// ```
/// use tourguide_sim::{InternalUsers, VISITS_PER_INTERNAL_USER};
///
/// let users = InternalUsers::new(42).generate(3);
/// assert_eq!(users.len(), 3);
/// assert_eq!(users[1].user_name, "internalUser1");
/// assert_eq!(users[1].email_address, "internalUser1@tourGuide.com");
/// assert_eq!(users[1].visited_locations().len(), VISITS_PER_INTERNAL_USER);
/// ```
#[derive(Debug, Clone)]
pub struct InternalUsers {
    rng: ChaCha8Rng,
}

impl InternalUsers {
    /// Build a generator seeded with `seed`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate `count` users named `internalUser0` onwards.
    pub fn generate(&mut self, count: usize) -> Vec<User> {
        let now = Utc::now();
        let users: Vec<_> = (0..count).map(|index| self.user(index, now)).collect();
        log::debug!("generated {} internal users", users.len());
        users
    }

    fn user(&mut self, index: usize, now: DateTime<Utc>) -> User {
        let name = format!("internalUser{index}");
        let email = format!("{name}@{INTERNAL_EMAIL_DOMAIN}");
        let id = UserId::from_uuid(random_uuid(&mut self.rng));
        let mut user = User::new(id, name, INTERNAL_PHONE_NUMBER, email);
        for _ in 0..VISITS_PER_INTERNAL_USER {
            let visit = self.visit(id, now);
            user.add_visited_location(visit);
        }
        user
    }

    fn visit(&mut self, user: UserId, now: DateTime<Utc>) -> VisitedLocation {
        let location = Coord {
            x: self.rng.gen_range(-LONGITUDE_LIMIT..=LONGITUDE_LIMIT),
            y: self.rng.gen_range(-LATITUDE_LIMIT..=LATITUDE_LIMIT),
        };
        let days_ago = self.rng.gen_range(0..VISIT_HISTORY_DAYS);
        let time_visited = TimeDelta::try_days(days_ago)
            .and_then(|delta| now.checked_sub_signed(delta))
            .unwrap_or(now);
        VisitedLocation::new(user, location, time_visited)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn generated_users_carry_contact_details() {
        let users = InternalUsers::new(1).generate(5);
        for (index, user) in users.iter().enumerate() {
            assert_eq!(user.user_name, format!("internalUser{index}"));
            assert_eq!(user.phone_number, INTERNAL_PHONE_NUMBER);
            assert_eq!(
                user.email_address,
                format!("internalUser{index}@tourGuide.com")
            );
            assert!(user.rewards().is_empty());
        }
    }

    #[rstest]
    fn visits_fall_within_the_history_window() {
        let started = Utc::now();
        let users = InternalUsers::new(2).generate(20);
        let oldest = started - TimeDelta::days(VISIT_HISTORY_DAYS);
        for visit in users.iter().flat_map(User::visited_locations) {
            assert!(visit.time_visited > oldest);
            assert!(visit.time_visited <= Utc::now());
            assert!(visit.location.y.abs() <= LATITUDE_LIMIT);
        }
    }

    #[rstest]
    fn identifiers_are_reproducible() {
        let first: Vec<_> = InternalUsers::new(8).generate(4).iter().map(|u| u.id).collect();
        let second: Vec<_> = InternalUsers::new(8).generate(4).iter().map(|u| u.id).collect();
        assert_eq!(first, second);
    }
}
