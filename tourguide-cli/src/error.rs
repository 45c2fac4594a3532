//! Error types emitted by the TourGuide CLI.

use std::sync::Arc;

use thiserror::Error;
use tourguide_core::{ProviderError, ProximityError, RewardError, WorkerPoolError};

/// Errors emitted by the TourGuide CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The worker pool size was zero.
    #[error("{field} must be at least 1")]
    ZeroPoolSize {
        /// Flag name.
        field: &'static str,
    },
    /// A coordinate fell outside its valid range.
    #[error("{field} {value} is outside [-{limit}, {limit}]")]
    InvalidCoordinate {
        /// Flag name.
        field: &'static str,
        /// Rejected value.
        value: f64,
        /// Largest accepted magnitude.
        limit: f64,
    },
    /// The reward radius was rejected.
    #[error(transparent)]
    InvalidRadius(#[from] ProximityError),
    /// The attraction catalogue could not be loaded.
    #[error("failed to load attraction catalogue: {0}")]
    Catalogue(#[source] ProviderError),
    /// The attraction catalogue holds no attractions.
    #[error("attraction catalogue is empty")]
    EmptyCatalogue,
    /// Building a worker pool failed.
    #[error(transparent)]
    WorkerPool(#[from] WorkerPoolError),
    /// Reward calculation failed.
    #[error("failed to calculate rewards: {0}")]
    Reward(#[from] RewardError),
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
