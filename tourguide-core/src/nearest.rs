//! Nearest-attraction queries.
//!
//! Selection keeps a bounded max-heap of the `k` best candidates ordered by
//! distance and then by attraction identifier, so equidistant attractions
//! are never collapsed into one entry.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use geo::Coord;

use crate::{Attraction, AttractionCatalog, AttractionId, User, distance_miles};

/// Number of attractions returned by the nearby-attractions query by default.
pub const DEFAULT_NEARBY_LIMIT: usize = 5;

/// An attraction paired with its distance from a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedAttraction<'a> {
    /// The selected attraction.
    pub attraction: &'a Attraction,
    /// Distance from the query point in statute miles.
    pub distance_miles: f64,
}

/// A nearby attraction annotated for display.
///
/// `reward_points` is the user's accumulated total across every attraction,
/// not the value of this attraction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NearbyAttraction {
    /// Attraction display name.
    pub attraction_name: String,
    /// Attraction position.
    pub attraction_location: Coord<f64>,
    /// Query position.
    pub user_location: Coord<f64>,
    /// Distance between the two positions in statute miles.
    pub distance_miles: f64,
    /// The user's total reward points.
    pub reward_points: u64,
}

#[derive(Debug, Clone, Copy)]
struct RankKey {
    distance: f64,
    id: AttractionId,
    index: usize,
}

impl Ord for RankKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.id.cmp(&other.id))
            .then_with(|| self.index.cmp(&other.index))
    }
}

impl PartialOrd for RankKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for RankKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for RankKey {}

/// Return up to `k` attractions closest to `location`, nearest first.
///
/// Ties on distance are broken by attraction identifier. Fewer than `k`
/// entries are returned only when the catalogue is smaller than `k`; `k == 0`
/// yields an empty result.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use tourguide_core::{Attraction, AttractionCatalog, nearest_k};
///
/// let catalog = AttractionCatalog::new(vec![
///     Attraction::with_random_id("Far", Coord { x: 0.0, y: 2.0 }),
///     Attraction::with_random_id("Near", Coord { x: 0.0, y: 1.0 }),
/// ]);
///
/// let nearest = nearest_k(&catalog, Coord { x: 0.0, y: 0.0 }, 1);
/// assert_eq!(nearest.len(), 1);
/// assert_eq!(nearest[0].attraction.name, "Near");
/// ```
pub fn nearest_k(
    catalog: &AttractionCatalog,
    location: Coord<f64>,
    k: usize,
) -> Vec<RankedAttraction<'_>> {
    if k == 0 || catalog.is_empty() {
        return Vec::new();
    }

    let mut heap = BinaryHeap::with_capacity(k.min(catalog.len()));
    for (index, attraction) in catalog.iter().enumerate() {
        let key = RankKey {
            distance: distance_miles(location, attraction.location),
            id: attraction.id,
            index,
        };
        if heap.len() < k {
            heap.push(key);
        } else if let Some(mut worst) = heap.peek_mut() {
            if key < *worst {
                *worst = key;
            }
        }
    }

    let mut keys = heap.into_vec();
    keys.sort_unstable();
    keys.into_iter()
        .filter_map(|key| {
            catalog
                .all()
                .get(key.index)
                .map(|attraction| RankedAttraction {
                    attraction,
                    distance_miles: key.distance,
                })
        })
        .collect()
}

/// Return the `k` nearest attractions to `location`, annotated for `user`.
pub fn nearby_attractions(
    catalog: &AttractionCatalog,
    location: Coord<f64>,
    k: usize,
    user: &User,
) -> Vec<NearbyAttraction> {
    let reward_points = user.total_reward_points();
    nearest_k(catalog, location, k)
        .into_iter()
        .map(|ranked| NearbyAttraction {
            attraction_name: ranked.attraction.name.clone(),
            attraction_location: ranked.attraction.location,
            user_location: location,
            distance_miles: ranked.distance_miles,
            reward_points,
        })
        .collect()
}
