//! `rewards` command: one reward pass over a batch of simulated users.

use std::io::Write;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use tourguide_core::{
    AttractionCatalog, BatchRewardProcessor, ProximityPolicy, RewardEngine, VisitedLocation,
    WorkerPoolConfig,
};
use tourguide_sim::{InternalUsers, SimulatedGps, SimulatedRewardCentral};

use crate::{
    ARG_DEADLINE_SECS, ARG_POOL_SIZE, ARG_REWARD_RADIUS, ARG_SEED, ARG_USER_COUNT, BatchSummary,
    CliError, DEFAULT_SEED, DEFAULT_USER_COUNT, elapsed_millis, rewards_in_ledgers, write_json,
};

/// CLI arguments for the `rewards` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Generate simulated users, place each at the first catalogued \
                 attraction, and run one batch reward pass on a bounded worker \
                 pool. Options can come from CLI flags, configuration files, \
                 or environment variables.",
    about = "Grant rewards to a batch of simulated users"
)]
#[ortho_config(prefix = "TOURGUIDE")]
pub(crate) struct RewardsArgs {
    /// Number of simulated users to generate.
    #[arg(long = ARG_USER_COUNT, value_name = "count")]
    #[serde(default)]
    pub(crate) user_count: Option<usize>,
    /// Worker threads in the reward pool.
    #[arg(long = ARG_POOL_SIZE, value_name = "threads")]
    #[serde(default)]
    pub(crate) pool_size: Option<usize>,
    /// Reward radius in statute miles.
    #[arg(long = ARG_REWARD_RADIUS, value_name = "miles")]
    #[serde(default)]
    pub(crate) reward_radius: Option<f64>,
    /// Stop starting tasks after this many seconds.
    #[arg(long = ARG_DEADLINE_SECS, value_name = "seconds")]
    #[serde(default)]
    pub(crate) deadline_secs: Option<u64>,
    /// Seed for every simulator.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
}

impl RewardsArgs {
    pub(crate) fn into_config(self) -> Result<RewardsConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RewardsConfig::try_from(merged)
    }
}

/// Resolved `rewards` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RewardsConfig {
    pub(crate) user_count: usize,
    pub(crate) pool: WorkerPoolConfig,
    pub(crate) policy: ProximityPolicy,
    pub(crate) seed: u64,
}

impl TryFrom<RewardsArgs> for RewardsConfig {
    type Error = CliError;

    fn try_from(args: RewardsArgs) -> Result<Self, Self::Error> {
        let mut pool = match args.pool_size {
            Some(size) => WorkerPoolConfig::new(
                NonZeroUsize::new(size).ok_or(CliError::ZeroPoolSize {
                    field: ARG_POOL_SIZE,
                })?,
            ),
            None => WorkerPoolConfig::rewards_default(),
        };
        if let Some(secs) = args.deadline_secs {
            pool = pool.with_deadline(Duration::from_secs(secs));
        }
        let policy = match args.reward_radius {
            Some(radius) => ProximityPolicy::with_reward_radius(radius)?,
            None => ProximityPolicy::default(),
        };
        Ok(Self {
            user_count: args.user_count.unwrap_or(DEFAULT_USER_COUNT),
            pool,
            policy,
            seed: args.seed.unwrap_or(DEFAULT_SEED),
        })
    }
}

pub(crate) fn run_rewards(args: RewardsArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let summary = execute_rewards(&config)?;
    write_json(writer, &summary)
}

pub(crate) fn execute_rewards(config: &RewardsConfig) -> Result<BatchSummary, CliError> {
    let gps = SimulatedGps::new(config.seed);
    let catalog = Arc::new(AttractionCatalog::load(&gps).map_err(CliError::Catalogue)?);
    let meeting_point = catalog
        .iter()
        .next()
        .map(|attraction| attraction.location)
        .ok_or(CliError::EmptyCatalogue)?;
    let engine = RewardEngine::with_policy(
        catalog,
        SimulatedRewardCentral::new(config.seed),
        config.policy,
    );

    let mut users = InternalUsers::new(config.seed).generate(config.user_count);
    for user in &mut users {
        user.add_visited_location(VisitedLocation::new(user.id, meeting_point, Utc::now()));
    }

    let processor = BatchRewardProcessor::new(&engine, config.pool)?;
    let report = processor.process_all(&mut users);
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
) -> Result<RewardsConfig, CliError> {
    let merged = RewardsArgs::merge_from_layers(layers).map_err(CliError::from)?;
    RewardsConfig::try_from(merged)
}
