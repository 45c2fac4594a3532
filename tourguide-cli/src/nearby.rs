//! `nearby` command: the attractions closest to a point.

use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use geo::Coord;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tourguide_core::{
    AttractionCatalog, DEFAULT_NEARBY_LIMIT, NearbyAttraction, RewardEngine, User,
    VisitedLocation,
};
use tourguide_sim::{LATITUDE_LIMIT, LONGITUDE_LIMIT, SimulatedGps, SimulatedRewardCentral};

use crate::{
    ARG_LATITUDE, ARG_LIMIT, ARG_LONGITUDE, ARG_SEED, CliError, DEFAULT_SEED, ENV_LATITUDE,
    ENV_LONGITUDE, write_json,
};

/// CLI arguments for the `nearby` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Rank the simulated attraction catalogue by distance from a \
                 point. A fresh user is placed at the point and rewarded first, \
                 so each entry reports that user's total reward points.",
    about = "List the attractions nearest to a point"
)]
#[ortho_config(prefix = "TOURGUIDE")]
pub(crate) struct NearbyArgs {
    /// Latitude of the query point in degrees.
    #[arg(long = ARG_LATITUDE, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) latitude: Option<f64>,
    /// Longitude of the query point in degrees.
    #[arg(long = ARG_LONGITUDE, value_name = "degrees", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) longitude: Option<f64>,
    /// Number of attractions to list.
    #[arg(long = ARG_LIMIT, value_name = "count")]
    #[serde(default)]
    pub(crate) limit: Option<usize>,
    /// Seed for every simulator.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl NearbyArgs {
    pub(crate) fn into_config(self) -> Result<NearbyConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        NearbyConfig::try_from(merged)
    }
}

/// Resolved `nearby` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NearbyConfig {
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) limit: usize,
    pub(crate) seed: u64,
}

impl TryFrom<NearbyArgs> for NearbyConfig {
    type Error = CliError;

    fn try_from(args: NearbyArgs) -> Result<Self, Self::Error> {
        let latitude = args.latitude.ok_or(CliError::MissingArgument {
            field: ARG_LATITUDE,
            env: ENV_LATITUDE,
        })?;
        let longitude = args.longitude.ok_or(CliError::MissingArgument {
            field: ARG_LONGITUDE,
            env: ENV_LONGITUDE,
        })?;
        require_within(ARG_LATITUDE, latitude, LATITUDE_LIMIT)?;
        require_within(ARG_LONGITUDE, longitude, LONGITUDE_LIMIT)?;
        Ok(Self {
            latitude,
            longitude,
            limit: args.limit.unwrap_or(DEFAULT_NEARBY_LIMIT),
            seed: args.seed.unwrap_or(DEFAULT_SEED),
        })
    }
}

fn require_within(field: &'static str, value: f64, limit: f64) -> Result<(), CliError> {
    if value.abs() <= limit {
        Ok(())
    } else {
        Err(CliError::InvalidCoordinate {
            field,
            value,
            limit,
        })
    }
}

pub(crate) fn run_nearby(args: NearbyArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let nearby = execute_nearby(&config)?;
    write_json(writer, &nearby)
}

pub(crate) fn execute_nearby(config: &NearbyConfig) -> Result<Vec<NearbyAttraction>, CliError> {
    let gps = SimulatedGps::new(config.seed);
    let catalog = Arc::new(AttractionCatalog::load(&gps).map_err(CliError::Catalogue)?);
    let engine = RewardEngine::new(catalog, SimulatedRewardCentral::new(config.seed));

    let location = geo_point(config);
    let mut user = User::with_random_id("nearbyUser");
    user.add_visited_location(VisitedLocation::new(user.id, location, Utc::now()));
    engine.calculate_rewards(&mut user)?;

    Ok(engine.nearby_attractions(location, config.limit, &user))
}

const fn geo_point(config: &NearbyConfig) -> Coord<f64> {
    Coord {
        x: config.longitude,
        y: config.latitude,
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<NearbyConfig, CliError> {
    let merged = NearbyArgs::merge_from_layers(layers).map_err(CliError::from)?;
    NearbyConfig::try_from(merged)
}
