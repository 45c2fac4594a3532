//! Bounded worker pool running one task per user.

use std::any::Any;
use std::num::NonZeroUsize;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tokio_util::sync::CancellationToken;

use super::{BatchReport, TaskError, UserOutcome, WorkerPoolError};
use crate::User;

const REWARD_POOL_SIZE: NonZeroUsize = match NonZeroUsize::new(50) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};
const TRACKING_POOL_SIZE: NonZeroUsize = match NonZeroUsize::new(30) {
    Some(size) => size,
    None => NonZeroUsize::MIN,
};

/// Sizing and deadline for a [`WorkerPool`].
///
/// The pool size is fixed when the pool is built and does not depend on the
/// number of users submitted.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use std::time::Duration;
/// use tourguide_core::WorkerPoolConfig;
///
/// let config = WorkerPoolConfig::rewards_default()
///     .with_size(NonZeroUsize::new(8).expect("non-zero"))
///     .with_deadline(Duration::from_secs(30));
/// assert_eq!(config.size().get(), 8);
/// assert_eq!(config.deadline(), Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerPoolConfig {
    size: NonZeroUsize,
    deadline: Option<Duration>,
}

impl WorkerPoolConfig {
    /// Configuration with `size` threads and no deadline.
    pub const fn new(size: NonZeroUsize) -> Self {
        Self {
            size,
            deadline: None,
        }
    }

    /// Fifty threads, as used for batch reward computation.
    pub const fn rewards_default() -> Self {
        Self::new(REWARD_POOL_SIZE)
    }

    /// Thirty threads, as used for batch location tracking.
    pub const fn tracking_default() -> Self {
        Self::new(TRACKING_POOL_SIZE)
    }

    /// Replace the thread count.
    #[must_use]
    pub const fn with_size(mut self, size: NonZeroUsize) -> Self {
        self.size = size;
        self
    }

    /// Stop starting new tasks once `deadline` has elapsed from the start of
    /// a batch.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Remove any deadline; batches wait for every task.
    #[must_use]
    pub const fn without_deadline(mut self) -> Self {
        self.deadline = None;
        self
    }

    /// Number of worker threads.
    pub const fn size(&self) -> NonZeroUsize {
        self.size
    }

    /// Per-batch deadline, if any.
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}

impl Default for WorkerPoolConfig {
    fn default() -> Self {
        Self::rewards_default()
    }
}

/// A fixed-size thread pool that runs one task per user.
///
/// Every task is isolated: an error or panic is recorded against its user and
/// the remaining tasks carry on. Tasks check the pool's
/// [`CancellationToken`] and the configured deadline before starting; tasks
/// that have not started when either fires are reported as
/// [`TaskError::Cancelled`]. A running task is never interrupted.
///
/// Cancelling the token is permanent: later batches on the same pool report
/// every user as cancelled.
#[derive(Debug)]
pub struct WorkerPool {
    pool: ThreadPool,
    config: WorkerPoolConfig,
    cancellation: CancellationToken,
}

impl WorkerPool {
    /// Build a pool named `name` from `config`.
    pub fn new(name: &str, config: WorkerPoolConfig) -> Result<Self, WorkerPoolError> {
        Self::with_cancellation(name, config, CancellationToken::new())
    }

    /// Build a pool that observes an existing cancellation token.
    ///
    /// Sharing one token between pools lets a caller stop several batches at
    /// once.
    pub fn with_cancellation(
        name: &str,
        config: WorkerPoolConfig,
        cancellation: CancellationToken,
    ) -> Result<Self, WorkerPoolError> {
        let prefix = name.to_owned();
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.size().get())
            .thread_name(move |index| format!("{prefix}-{index}"))
            .build()?;
        log::debug!(
            "built worker pool {name} with {} threads",
            config.size().get()
        );
        Ok(Self {
            pool,
            config,
            cancellation,
        })
    }

    /// The configuration the pool was built with.
    pub const fn config(&self) -> &WorkerPoolConfig {
        &self.config
    }

    /// Token observed by every task on this pool.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Cancel every task that has not started yet.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    /// Run `task` once for every user and wait for all of them.
    ///
    /// The report holds exactly one outcome per user, in input order,
    /// regardless of completion order.
    pub fn run<T, F>(&self, users: &mut [User], task: F) -> BatchReport<T>
    where
        T: Send,
        F: Fn(&mut User) -> Result<T, TaskError> + Sync,
    {
        let started = Instant::now();
        let cutoff = self
            .config
            .deadline()
            .and_then(|deadline| started.checked_add(deadline));

        let outcomes: Vec<UserOutcome<T>> = self.pool.install(|| {
            users
                .par_iter_mut()
                .map(|user| {
                    let user_id = user.id;
                    let result = self.run_one(user, cutoff, &task);
                    UserOutcome { user_id, result }
                })
                .collect()
        });

        BatchReport::new(outcomes, started.elapsed())
    }

    fn run_one<T, F>(
        &self,
        user: &mut User,
        cutoff: Option<Instant>,
        task: &F,
    ) -> Result<T, TaskError>
    where
        F: Fn(&mut User) -> Result<T, TaskError>,
    {
        if self.cancellation.is_cancelled() || cutoff.is_some_and(|at| Instant::now() >= at) {
            return Err(TaskError::Cancelled);
        }
        catch_unwind(AssertUnwindSafe(|| task(user))).unwrap_or_else(|payload| {
            Err(TaskError::Panicked {
                message: panic_message(payload.as_ref()),
            })
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "task panicked with a non-string payload".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn users(count: usize) -> Vec<User> {
        (0..count)
            .map(|index| User::with_random_id(format!("user{index}")))
            .collect()
    }

    fn small_pool() -> WorkerPool {
        let size = NonZeroUsize::new(4).expect("non-zero");
        WorkerPool::new("test", WorkerPoolConfig::new(size)).expect("pool builds")
    }

    #[rstest]
    fn defaults_match_batch_sizes() {
        assert_eq!(WorkerPoolConfig::rewards_default().size().get(), 50);
        assert_eq!(WorkerPoolConfig::tracking_default().size().get(), 30);
        assert_eq!(WorkerPoolConfig::default().deadline(), None);
    }

    #[rstest]
    fn outcomes_follow_input_order() {
        let pool = small_pool();
        let mut batch = users(64);
        let expected: Vec<_> = batch.iter().map(|user| user.id).collect();

        let report = pool.run(&mut batch, |user| Ok(user.user_name.len()));

        let seen: Vec<_> = report.iter().map(|outcome| outcome.user_id).collect();
        assert_eq!(seen, expected);
        assert_eq!(report.success_count(), 64);
    }

    #[rstest]
    fn panics_are_attributed_to_their_user() {
        let pool = small_pool();
        let mut batch = users(8);
        let victim = batch.get(3).map(|user| user.id).expect("eight users");

        let report = pool.run(&mut batch, |user| {
            assert_ne!(user.id, victim, "boom");
            Ok(())
        });

        assert_eq!(report.len(), 8);
        assert_eq!(report.failure_count(), 1);
        let (failed, err) = report.failures().next().expect("one failure");
        assert_eq!(failed, victim);
        assert!(matches!(err, TaskError::Panicked { message } if message.contains("boom")));
    }

    #[rstest]
    fn cancelled_pool_reports_every_user() {
        let pool = small_pool();
        pool.cancel();
        let mut batch = users(5);

        let report = pool.run(&mut batch, |_| Ok(()));

        assert_eq!(report.len(), 5);
        assert!(report.iter().all(|outcome| outcome.result == Err(TaskError::Cancelled)));
    }

    #[rstest]
    fn elapsed_deadline_cancels_pending_tasks() {
        let size = NonZeroUsize::new(1).expect("non-zero");
        let config = WorkerPoolConfig::new(size).with_deadline(Duration::ZERO);
        let pool = WorkerPool::new("deadline", config).expect("pool builds");
        let mut batch = users(3);

        let report = pool.run(&mut batch, |_| Ok(()));

        assert_eq!(report.failure_count(), 3);
    }

    #[rstest]
    fn deadline_mid_batch_cancels_only_later_users() {
        let config = WorkerPoolConfig::new(NonZeroUsize::MIN)
            .with_deadline(Duration::from_millis(200));
        let pool = WorkerPool::new("deadline", config).expect("pool builds");
        let mut batch = users(10);

        let report = pool.run(&mut batch, |_| {
            std::thread::sleep(Duration::from_millis(60));
            Ok(())
        });

        assert_eq!(report.len(), 10);
        assert!(report.success_count() >= 1, "the first user starts immediately");
        assert!(report.failure_count() >= 1, "ten 60 ms tasks overrun 200 ms");
        assert!(
            report.failures().all(|(_, err)| *err == TaskError::Cancelled),
            "late users are cancelled, not failed"
        );
        let first_cancelled = report
            .iter()
            .position(|outcome| !outcome.is_success())
            .expect("some user was cancelled");
        assert!(
            report.iter().skip(first_cancelled).all(|outcome| !outcome.is_success()),
            "a single worker runs users in order, so successes form a prefix"
        );
    }

    #[rstest]
    fn shared_token_cancels_both_pools() {
        let token = CancellationToken::new();
        let size = NonZeroUsize::new(2).expect("non-zero");
        let first = WorkerPool::with_cancellation("a", WorkerPoolConfig::new(size), token.clone())
            .expect("pool builds");
        let second = WorkerPool::with_cancellation("b", WorkerPoolConfig::new(size), token.clone())
            .expect("pool builds");
        token.cancel();

        assert!(first.cancellation_token().is_cancelled());
        assert!(second.cancellation_token().is_cancelled());
    }
}
