//! Great-circle distance on a spherical earth.
//!
//! Distances are computed with the spherical law of cosines. The central
//! angle is expressed in nautical miles (one minute of arc each) and then
//! converted to statute miles.

use geo::Coord;

/// Statute miles in one nautical mile.
pub const STATUTE_MILES_PER_NAUTICAL_MILE: f64 = 1.150_779_45;

/// Nautical miles per degree of arc.
const NAUTICAL_MILES_PER_DEGREE: f64 = 60.0;

/// Return the great-circle distance between `a` and `b` in statute miles.
///
/// Coordinates are WGS84 degrees with `x = longitude` and `y = latitude`.
/// The cosine of the central angle is clamped into `[-1.0, 1.0]` before the
/// inverse cosine so rounding error never produces `NaN`; identical finite
/// points always yield `0.0`. A non-finite coordinate yields
/// [`f64::INFINITY`], which no reward radius or proximity range accepts.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use tourguide_core::{STATUTE_MILES_PER_NAUTICAL_MILE, distance_miles};
///
/// let a = Coord { x: 0.0, y: 0.0 };
/// let b = Coord { x: 0.0, y: 1.0 / 60.0 };
///
/// assert_eq!(distance_miles(a, a), 0.0);
/// assert!((distance_miles(a, b) - STATUTE_MILES_PER_NAUTICAL_MILE).abs() < 1e-6);
/// ```
#[must_use]
#[expect(
    clippy::float_arithmetic,
    reason = "great-circle distance is inherently floating-point"
)]
pub fn distance_miles(a: Coord<f64>, b: Coord<f64>) -> f64 {
    if !(a.x.is_finite() && a.y.is_finite() && b.x.is_finite() && b.y.is_finite()) {
        return f64::INFINITY;
    }
    if a == b {
        return 0.0;
    }
    let lat1 = a.y.to_radians();
    let lon1 = a.x.to_radians();
    let lat2 = b.y.to_radians();
    let lon2 = b.x.to_radians();

    let cosine = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon1 - lon2).cos();
    let angle = cosine.clamp(-1.0, 1.0).acos();

    let nautical_miles = NAUTICAL_MILES_PER_DEGREE * angle.to_degrees();
    STATUTE_MILES_PER_NAUTICAL_MILE * nautical_miles
}
