//! `track` command: track a batch of simulated users.

use std::io::Write;
use std::num::NonZeroUsize;
use std::sync::Arc;

use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tourguide_core::{AttractionCatalog, LocationTracker, RewardEngine, WorkerPoolConfig};
use tourguide_sim::{InternalUsers, SimulatedGps, SimulatedRewardCentral};

use crate::{
    ARG_POOL_SIZE, ARG_SEED, ARG_USER_COUNT, BatchSummary, CliError, DEFAULT_SEED,
    DEFAULT_USER_COUNT, elapsed_millis, rewards_in_ledgers, write_json,
};

/// CLI arguments for the `track` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Generate simulated users with a short visit history, fetch a \
                 fresh location for each on a bounded worker pool, and \
                 recalculate their rewards.",
    about = "Track a batch of simulated users"
)]
#[ortho_config(prefix = "TOURGUIDE")]
pub(crate) struct TrackArgs {
    /// Number of simulated users to generate.
    #[arg(long = ARG_USER_COUNT, value_name = "count")]
    #[serde(default)]
    pub(crate) user_count: Option<usize>,
    /// Worker threads in the tracking pool.
    #[arg(long = ARG_POOL_SIZE, value_name = "threads")]
    #[serde(default)]
    pub(crate) pool_size: Option<usize>,
    /// Seed for every simulator.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl TrackArgs {
    pub(crate) fn into_config(self) -> Result<TrackConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        TrackConfig::try_from(merged)
    }
}

/// Resolved `track` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TrackConfig {
    pub(crate) user_count: usize,
    pub(crate) pool: WorkerPoolConfig,
    pub(crate) seed: u64,
}

impl TryFrom<TrackArgs> for TrackConfig {
    type Error = CliError;

    fn try_from(args: TrackArgs) -> Result<Self, Self::Error> {
        let pool = match args.pool_size {
            Some(size) => WorkerPoolConfig::new(
                NonZeroUsize::new(size).ok_or(CliError::ZeroPoolSize {
                    field: ARG_POOL_SIZE,
                })?,
            ),
            None => WorkerPoolConfig::tracking_default(),
        };
        Ok(Self {
            user_count: args.user_count.unwrap_or(DEFAULT_USER_COUNT),
            pool,
            seed: args.seed.unwrap_or(DEFAULT_SEED),
        })
    }
}

pub(crate) fn run_track(args: TrackArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let summary = execute_track(&config)?;
    write_json(writer, &summary)
}

pub(crate) fn execute_track(config: &TrackConfig) -> Result<BatchSummary, CliError> {
    let gps = SimulatedGps::new(config.seed);
    let catalog = Arc::new(AttractionCatalog::load(&gps).map_err(CliError::Catalogue)?);
    let engine = RewardEngine::new(catalog, SimulatedRewardCentral::new(config.seed));
    let tracker = LocationTracker::new(&gps, &engine, config.pool)?;

    let mut users = InternalUsers::new(config.seed).generate(config.user_count);
    let report = tracker.track_all(&mut users);
    let rewards_granted = rewards_in_ledgers(&users);

    Ok(BatchSummary {
        users: report.len(),
        succeeded: report.success_count(),
        failed: report.failure_count(),
        rewards_granted,
        elapsed_ms: elapsed_millis(report.elapsed()),
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<TrackConfig, CliError> {
    let merged = TrackArgs::merge_from_layers(layers).map_err(CliError::from)?;
    TrackConfig::try_from(merged)
}
