//! Command-line interface for running the TourGuide reward engine against
//! simulated collaborators.
#![forbid(unsafe_code)]

use std::io::Write;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

mod error;
mod nearby;
mod rewards;
mod track;

pub use error::CliError;

use nearby::NearbyArgs;
use rewards::RewardsArgs;
use track::TrackArgs;

pub(crate) const ARG_USER_COUNT: &str = "user-count";
pub(crate) const ARG_POOL_SIZE: &str = "pool-size";
pub(crate) const ARG_REWARD_RADIUS: &str = "reward-radius";
pub(crate) const ARG_DEADLINE_SECS: &str = "deadline-secs";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ARG_LATITUDE: &str = "latitude";
pub(crate) const ARG_LONGITUDE: &str = "longitude";
pub(crate) const ARG_LIMIT: &str = "limit";
pub(crate) const ENV_LATITUDE: &str = "TOURGUIDE_CMDS_NEARBY_LATITUDE";
pub(crate) const ENV_LONGITUDE: &str = "TOURGUIDE_CMDS_NEARBY_LONGITUDE";

/// Number of simulated users generated when none is requested.
pub(crate) const DEFAULT_USER_COUNT: usize = 100;

/// Seed used for every simulator when none is requested.
pub(crate) const DEFAULT_SEED: u64 = 42;

/// Run the TourGuide CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    init_logging();
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Rewards(args) => rewards::run_rewards(args, &mut stdout),
        Command::Track(args) => track::run_track(args, &mut stdout),
        Command::Nearby(args) => nearby::run_nearby(args, &mut stdout),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
    if installed.is_err() {
        log::debug!("logging was already initialised");
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "tourguide",
    about = "Run the TourGuide proximity reward engine against simulated providers",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Grant rewards to a batch of simulated users.
    Rewards(RewardsArgs),
    /// Track a batch of simulated users and refresh their rewards.
    Track(TrackArgs),
    /// List the attractions nearest to a point.
    Nearby(NearbyArgs),
}

/// Summary printed by the batch subcommands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct BatchSummary {
    /// Users submitted to the batch.
    pub(crate) users: usize,
    /// Users whose task succeeded.
    pub(crate) succeeded: usize,
    /// Users whose task failed or was cancelled.
    pub(crate) failed: usize,
    /// Rewards granted by the batch across all users.
    pub(crate) rewards_granted: u64,
    /// Wall-clock duration of the batch.
    pub(crate) elapsed_ms: u64,
}

/// Rewards held across every user's ledger, including rewards committed by a
/// pass that later failed.
pub(crate) fn rewards_in_ledgers(users: &[tourguide_core::User]) -> u64 {
    users
        .iter()
        .map(|user| u64::try_from(user.rewards().len()).unwrap_or(u64::MAX))
        .fold(0, u64::saturating_add)
}

pub(crate) fn elapsed_millis(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
}

pub(crate) fn write_json<T>(writer: &mut dyn Write, value: &T) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerializeOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
mod tests;
