//! Property-based tests for the reward engine.
//!
//! # Invariants tested
//!
//! - **Distance identity and symmetry:** `d(a, a) == 0` and `d(a, b) == d(b, a)`.
//! - **Nearest-K shape:** exactly `min(k, n)` distinct attractions, ascending.
//! - **Reward uniqueness:** at most one reward per attraction, and a second
//!   pass never adds more.
//! - **Batch completeness:** one outcome per submitted user.

use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::sync::Arc;

use chrono::Utc;
use geo::Coord;
use proptest::prelude::*;
use tourguide_core::test_support::ConstantPoints;
use tourguide_core::{
    Attraction, AttractionCatalog, AttractionId, BatchRewardProcessor, RewardEngine, User,
    VisitedLocation, WorkerPoolConfig, distance_miles, nearest_k,
};
use uuid::Uuid;

fn coord() -> impl Strategy<Value = Coord<f64>> {
    (-180.0_f64..=180.0, -85.0_f64..=85.0).prop_map(|(x, y)| Coord { x, y })
}

/// Attractions on a coarse grid so exact distance ties are common.
fn catalog_strategy() -> impl Strategy<Value = AttractionCatalog> {
    prop::collection::vec((-5_i8..=5, -5_i8..=5), 0..40).prop_map(|cells| {
        let attractions = cells
            .into_iter()
            .enumerate()
            .map(|(index, (x, y))| {
                let id = AttractionId::from_uuid(Uuid::from_u128(
                    u128::try_from(index).unwrap_or_default(),
                ));
                let location = Coord {
                    x: f64::from(x),
                    y: f64::from(y),
                };
                Attraction::new(id, format!("cell{index}"), location)
            })
            .collect();
        AttractionCatalog::new(attractions)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn distance_to_self_is_zero(a in coord()) {
        prop_assert_eq!(distance_miles(a, a), 0.0);
    }

    #[test]
    fn distance_is_symmetric(a in coord(), b in coord()) {
        let forward = distance_miles(a, b);
        let backward = distance_miles(b, a);
        prop_assert!((forward - backward).abs() < 1e-6, "{forward} != {backward}");
        prop_assert!(forward.is_finite() && forward >= 0.0);
    }

    #[test]
    fn nearest_k_returns_distinct_sorted_attractions(
        catalog in catalog_strategy(),
        origin in (-5.0_f64..=5.0, -5.0_f64..=5.0),
        k in 0_usize..12,
    ) {
        let location = Coord { x: origin.0, y: origin.1 };
        let ranked = nearest_k(&catalog, location, k);

        prop_assert_eq!(ranked.len(), k.min(catalog.len()));
        let ids: HashSet<_> = ranked.iter().map(|entry| entry.attraction.id).collect();
        prop_assert_eq!(ids.len(), ranked.len());
        for pair in ranked.windows(2) {
            if let [first, second] = pair {
                prop_assert!(first.distance_miles <= second.distance_miles);
            }
        }
        if let Some(worst) = ranked.last() {
            let excluded = catalog
                .iter()
                .filter(|attraction| !ids.contains(&attraction.id))
                .map(|attraction| distance_miles(location, attraction.location));
            for distance in excluded {
                prop_assert!(distance >= worst.distance_miles);
            }
        }
    }

    #[test]
    fn rewards_are_unique_and_idempotent(
        catalog in catalog_strategy(),
        visits in prop::collection::vec((-5.0_f64..=5.0, -5.0_f64..=5.0), 1..6),
        radius in 0.0_f64..500.0,
    ) {
        let mut engine = RewardEngine::new(Arc::new(catalog), ConstantPoints::new(1));
        engine.set_reward_radius(radius).expect("radius is non-negative");
        let mut user = User::with_random_id("prop");
        for (x, y) in visits {
            user.add_visited_location(VisitedLocation::new(user.id, Coord { x, y }, Utc::now()));
        }

        let added = engine.calculate_rewards(&mut user).expect("constant points never fail");
        prop_assert_eq!(added, user.rewards().len());
        let ids: HashSet<_> = user.rewards().iter().map(|reward| reward.attraction.id).collect();
        prop_assert_eq!(ids.len(), user.rewards().len());
        prop_assert_eq!(engine.calculate_rewards(&mut user), Ok(0));
    }

    #[test]
    fn unbounded_radius_rewards_each_attraction_once(catalog in catalog_strategy()) {
        let distinct: HashSet<_> = catalog.iter().map(|attraction| attraction.id).collect();
        let mut engine = RewardEngine::new(Arc::new(catalog), ConstantPoints::new(1));
        engine.set_reward_radius(f64::INFINITY).expect("infinity is accepted");
        let mut user = User::with_random_id("prop");
        user.add_visited_location(VisitedLocation::new(user.id, Coord { x: 0.0, y: 0.0 }, Utc::now()));

        engine.calculate_rewards(&mut user).expect("constant points never fail");
        prop_assert_eq!(user.rewards().len(), distinct.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn batch_reports_one_outcome_per_user(
        user_count in 0_usize..80,
        pool_size in 1_usize..9,
    ) {
        let catalog = AttractionCatalog::new(vec![Attraction::with_random_id(
            "Origin",
            Coord { x: 0.0, y: 0.0 },
        )]);
        let engine = RewardEngine::new(Arc::new(catalog), ConstantPoints::new(3));
        let size = NonZeroUsize::new(pool_size).expect("strategy yields non-zero sizes");
        let processor = BatchRewardProcessor::new(&engine, WorkerPoolConfig::new(size))
            .expect("pool builds");
        let mut users: Vec<User> = (0..user_count)
            .map(|index| User::with_random_id(format!("user{index}")))
            .collect();
        let expected: Vec<_> = users.iter().map(|user| user.id).collect();

        let report = processor.process_all(&mut users);

        prop_assert_eq!(report.len(), user_count);
        let seen: Vec<_> = report.iter().map(|outcome| outcome.user_id).collect();
        prop_assert_eq!(seen, expected);
    }
}
