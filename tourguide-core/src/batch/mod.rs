//! Batch reward computation on a bounded worker pool.
//!
//! A batch runs one task per user and always joins every task before
//! returning. Failures stay with the user that produced them: a provider
//! error, a panic or a cancellation becomes that user's [`UserOutcome`] and
//! never aborts sibling tasks.

mod pool;
mod report;

use thiserror::Error;

pub use pool::{WorkerPool, WorkerPoolConfig};
pub use report::{BatchReport, UserOutcome};

use crate::{RewardEngine, RewardError, RewardPointsProvider, TrackError, User};

/// Failure attributed to a single user's task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// Reward computation failed.
    #[error(transparent)]
    Reward(#[from] RewardError),
    /// Location tracking failed.
    #[error(transparent)]
    Track(#[from] TrackError),
    /// The task was not started because the batch was cancelled or its
    /// deadline passed.
    #[error("task cancelled before it started")]
    Cancelled,
    /// The task panicked.
    #[error("task panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
}

/// Errors raised while building a [`WorkerPool`].
#[derive(Debug, Error)]
pub enum WorkerPoolError {
    /// The thread pool could not be created.
    #[error("failed to build worker pool: {0}")]
    Build(#[from] rayon::ThreadPoolBuildError),
}

/// Applies one [`RewardEngine`] pass to every user of a batch.
///
/// The processor borrows the engine, so the reward radius cannot change while
/// a batch is running.
#[derive(Debug)]
pub struct BatchRewardProcessor<'e, P> {
    engine: &'e RewardEngine<P>,
    pool: WorkerPool,
}

impl<'e, P> BatchRewardProcessor<'e, P>
where
    P: RewardPointsProvider,
{
    /// Build a processor with its own pool.
    pub fn new(
        engine: &'e RewardEngine<P>,
        config: WorkerPoolConfig,
    ) -> Result<Self, WorkerPoolError> {
        let pool = WorkerPool::new("rewards", config)?;
        Ok(Self::with_pool(engine, pool))
    }

    /// Build a processor around an existing pool.
    pub const fn with_pool(engine: &'e RewardEngine<P>, pool: WorkerPool) -> Self {
        Self { engine, pool }
    }

    /// The pool tasks run on.
    pub const fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Calculate rewards for every user and wait for all tasks.
    ///
    /// Each successful outcome carries the number of rewards added for that
    /// user. The report holds exactly one outcome per user.
    pub fn process_all(&self, users: &mut [User]) -> BatchReport<usize> {
        let engine = self.engine;
        let report = self.pool.run(users, |user| {
            engine.calculate_rewards(user).map_err(TaskError::from)
        });
        log_summary("reward", &report);
        report
    }
}

pub(crate) fn log_summary<T>(kind: &str, report: &BatchReport<T>) {
    for (user, err) in report.failures() {
        log::warn!("{kind} task for user {user} failed: {err}");
    }
    log::info!(
        "{kind} batch finished: {} users, {} succeeded, {} failed in {:?}",
        report.len(),
        report.success_count(),
        report.failure_count(),
        report.elapsed()
    );
}
