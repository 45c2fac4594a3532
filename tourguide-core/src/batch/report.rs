//! Per-user outcomes of a batch run.

use std::time::Duration;

use crate::UserId;

use super::TaskError;

/// Result of one user's task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserOutcome<T> {
    /// User the task ran for.
    pub user_id: UserId,
    /// Task output or the failure attributed to this user.
    pub result: Result<T, TaskError>,
}

impl<T> UserOutcome<T> {
    /// Whether the task completed successfully.
    pub const fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// One outcome per submitted user, in submission order.
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use tourguide_core::test_support::ConstantPoints;
/// use tourguide_core::{
///     AttractionCatalog, BatchRewardProcessor, RewardEngine, User, WorkerPoolConfig,
/// };
///
/// let engine = RewardEngine::new(Arc::new(AttractionCatalog::default()), ConstantPoints::new(1));
/// let processor = BatchRewardProcessor::new(&engine, WorkerPoolConfig::rewards_default())?;
/// let mut users = vec![User::with_random_id("a"), User::with_random_id("b")];
///
/// let report = processor.process_all(&mut users);
/// assert_eq!(report.len(), 2);
/// assert_eq!(report.success_count(), 2);
/// # Ok::<(), tourguide_core::WorkerPoolError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReport<T> {
    outcomes: Vec<UserOutcome<T>>,
    elapsed: Duration,
}

impl<T> BatchReport<T> {
    pub(crate) const fn new(outcomes: Vec<UserOutcome<T>>, elapsed: Duration) -> Self {
        Self { outcomes, elapsed }
    }

    /// Number of outcomes, equal to the number of submitted users.
    pub const fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether the batch was empty.
    pub const fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Wall-clock time from dispatch to the final join.
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Iterate over all outcomes.
    pub fn iter(&self) -> std::slice::Iter<'_, UserOutcome<T>> {
        self.outcomes.iter()
    }

    /// Outcome recorded for `user`, if it was part of the batch.
    pub fn outcome_for(&self, user: UserId) -> Option<&UserOutcome<T>> {
        self.outcomes.iter().find(|outcome| outcome.user_id == user)
    }

    /// Successful outputs with their user.
    pub fn successes(&self) -> impl Iterator<Item = (UserId, &T)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok().map(|value| (outcome.user_id, value)))
    }

    /// Failures with their user.
    pub fn failures(&self) -> impl Iterator<Item = (UserId, &TaskError)> {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|err| (outcome.user_id, err)))
    }

    /// Number of successful tasks.
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_success()).count()
    }

    /// Number of failed or cancelled tasks.
    pub fn failure_count(&self) -> usize {
        self.len().saturating_sub(self.success_count())
    }

    /// Consume the report, returning the outcomes.
    pub fn into_outcomes(self) -> Vec<UserOutcome<T>> {
        self.outcomes
    }
}

impl<'a, T> IntoIterator for &'a BatchReport<T> {
    type Item = &'a UserOutcome<T>;
    type IntoIter = std::slice::Iter<'a, UserOutcome<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> IntoIterator for BatchReport<T> {
    type Item = UserOutcome<T>;
    type IntoIter = std::vec::IntoIter<UserOutcome<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.outcomes.into_iter()
    }
}
