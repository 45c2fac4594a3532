//! Simulated GPS: random positions and the built-in attraction catalogue.

use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use chrono::Utc;
use geo::Coord;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tourguide_core::{
    Attraction, AttractionId, AttractionSource, LocationProvider, ProviderError, UserId,
    VisitedLocation,
};

use crate::random_uuid;

/// Largest absolute latitude reported, the Web Mercator limit.
pub const LATITUDE_LIMIT: f64 = 85.051_128_78;

/// Largest absolute longitude reported.
pub const LONGITUDE_LIMIT: f64 = 180.0;

/// Built-in attractions as `(name, latitude, longitude)`.
const ATTRACTIONS: [(&str, f64, f64); 26] = [
    ("Disneyland", 33.817_595, -117.922_008),
    ("Jackson Hole", 43.582_767, -110.821_999),
    ("Mojave National Preserve", 35.141_689, -115.510_399),
    ("Joshua Tree National Park", 33.881_866, -115.900_65),
    ("Buffalo National River", 35.985_512, -92.757_652),
    ("Hot Springs National Park", 34.521_53, -93.042_267),
    ("Kartchner Caverns State Park", 31.837_551, -110.347_382),
    ("Legend Valley", 39.937_778, -82.406_67),
    ("Flowers Bakery of London", 37.131_527, -84.074_86),
    ("McKinley Tower", 61.218_887, -149.877_502),
    ("Flatiron Building", 43.617_882, -116.199_429),
    ("Fallingwater", 39.906_847, -79.468_386),
    ("Union Station", 38.897_095, -77.006_332),
    ("Roger Dean Stadium", 26.890_959, -80.116_577),
    ("Texas Memorial Stadium", 30.283_682, -97.732_536),
    ("Bryant-Denny Stadium", 33.208_973, -87.550_438),
    ("Tiger Stadium", 30.412_035, -91.183_815),
    ("Neyland Stadium", 35.955_013, -83.925_011),
    ("Kyle Field", 30.6099, -96.340_424),
    ("San Diego Zoo", 32.735_317, -117.149_048),
    ("Zoo Tampa at Lowry Park", 28.012_804, -82.469_269),
    ("Franklin Park Zoo", 42.302_601, -71.086_731),
    ("El Paso Zoo", 31.769_125, -106.444_87),
    ("Kansas City Zoo", 39.007_504, -94.529_625),
    ("Bronx Zoo", 40.852_905, -73.872_971),
    ("Cinderella Castle", 28.419_411, -81.5812),
];

/// Location provider reporting uniformly random positions.
///
/// The same value also serves the built-in attraction catalogue through
/// [`AttractionSource`]. Attraction identifiers are drawn from the seed when
/// the simulator is built, so two simulators with the same seed agree on
/// them.
///
/// # Examples
/// ```
/// use tourguide_core::{LocationProvider, UserId};
/// use tourguide_sim::{LATITUDE_LIMIT, SimulatedGps};
///
/// let gps = SimulatedGps::new(1);
/// let visit = gps.current_location(UserId::random())?;
/// assert!(visit.location.y.abs() <= LATITUDE_LIMIT);
/// assert_eq!(gps.attractions().len(), 26);
/// # Ok::<(), tourguide_core::ProviderError>(())
/// ```
#[derive(Debug)]
pub struct SimulatedGps {
    attractions: Vec<Attraction>,
    rng: Mutex<ChaCha8Rng>,
    latency: Duration,
}

impl SimulatedGps {
    /// Build a simulator seeded with `seed` and no artificial latency.
    pub fn new(seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let attractions = ATTRACTIONS
            .iter()
            .map(|&(name, latitude, longitude)| {
                let id = AttractionId::from_uuid(random_uuid(&mut rng));
                Attraction::new(
                    id,
                    name,
                    Coord {
                        x: longitude,
                        y: latitude,
                    },
                )
            })
            .collect();
        Self {
            attractions,
            rng: Mutex::new(rng),
            latency: Duration::ZERO,
        }
    }

    /// Sleep for `latency` before answering each location request.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// The built-in attractions in catalogue order.
    pub fn attractions(&self) -> &[Attraction] {
        &self.attractions
    }

    fn random_location(&self) -> Coord<f64> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        Coord {
            x: rng.gen_range(-LONGITUDE_LIMIT..=LONGITUDE_LIMIT),
            y: rng.gen_range(-LATITUDE_LIMIT..=LATITUDE_LIMIT),
        }
    }
}

impl LocationProvider for SimulatedGps {
    fn current_location(&self, user: UserId) -> Result<VisitedLocation, ProviderError> {
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        Ok(VisitedLocation::new(user, self.random_location(), Utc::now()))
    }
}

impl AttractionSource for SimulatedGps {
    fn list_attractions(&self) -> Result<Vec<Attraction>, ProviderError> {
        log::debug!("serving {} simulated attractions", self.attractions.len());
        Ok(self.attractions.clone())
    }
}
