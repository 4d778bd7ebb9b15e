//! Classified outcomes of a failed remote call.

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Why a remote call produced no body.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The breaker rejected the call; nothing was sent.
    #[error("circuit breaker is open")]
    CircuitOpen,

    /// The call did not finish within the time limit.
    #[error("remote call timed out after {0:?}")]
    TimedOut(Duration),

    /// The remote answered with a 4xx status.
    #[error("remote operation '{0}' not found")]
    RemoteNotFound(String),

    /// The remote answered with a status that is neither 2xx nor 4xx.
    #[error("remote responded with status {0}")]
    RemoteStatus(StatusCode),

    /// Connection, protocol or body decoding failure.
    #[error("remote transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The operation name was empty; rejected before the breaker.
    #[error("operation must not be empty")]
    InvalidOperation,

    /// The task driving the call panicked or was cancelled.
    #[error("remote call aborted: {0}")]
    Aborted(String),
}

impl FetchError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::CircuitOpen => "circuit_open",
            FetchError::TimedOut(_) => "timed_out",
            FetchError::RemoteNotFound(_) => "not_found",
            FetchError::RemoteStatus(_) => "remote_error",
            FetchError::Transport(_) => "transport_error",
            FetchError::InvalidOperation => "invalid_operation",
            FetchError::Aborted(_) => "aborted",
        }
    }

    /// Whether the caller should see this as "no such resource".
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::RemoteNotFound(_) | FetchError::InvalidOperation)
    }
}
