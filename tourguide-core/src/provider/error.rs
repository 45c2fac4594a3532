use thiserror::Error;

use crate::UserId;

/// Errors raised by external collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The collaborator could not serve the request.
    ///
    /// Covers transport failures and remote errors. Callers treat it as a
    /// transient failure for the affected user only.
    #[error("{provider} unavailable: {message}")]
    Unavailable {
        /// Name of the failing collaborator.
        provider: &'static str,
        /// Human-readable failure description.
        message: String,
    },
    /// The collaborator has no record of the user.
    #[error("unknown user {user}")]
    UnknownUser {
        /// Identifier that could not be resolved.
        user: UserId,
    },
}

impl ProviderError {
    /// Build an [`ProviderError::Unavailable`] error.
    pub fn unavailable(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            provider,
            message: message.into(),
        }
    }
}
