//! Execution styles selectable per request.
//!
//! Every style runs the same facade future and yields the same outcome; only
//! the way the future is driven differs:
//! - `flux`, `coroutine`: awaited inline on the request task
//! - `mixed`: spawned as a separate task and joined
//! - `blocking`: driven to completion on the blocking pool with
//!   `Handle::block_on`, occupying a whole thread for the duration

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::runtime::Handle;

use crate::service::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStyle {
    Blocking,
    Flux,
    Coroutine,
    Mixed,
}

impl ExecutionStyle {
    pub const ALL: [ExecutionStyle; 4] = [
        ExecutionStyle::Blocking,
        ExecutionStyle::Flux,
        ExecutionStyle::Coroutine,
        ExecutionStyle::Mixed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStyle::Blocking => "blocking",
            ExecutionStyle::Flux => "flux",
            ExecutionStyle::Coroutine => "coroutine",
            ExecutionStyle::Mixed => "mixed",
        }
    }

    /// Drive `fut` in this style.
    pub async fn run<F, T>(self, fut: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, ServiceError>> + Send + 'static,
        T: Send + 'static,
    {
        match self {
            ExecutionStyle::Flux | ExecutionStyle::Coroutine => fut.await,
            ExecutionStyle::Mixed => tokio::spawn(fut)
                .await
                .map_err(|e| ServiceError::Execution(e.to_string()))?,
            ExecutionStyle::Blocking => {
                let handle = Handle::current();
                tokio::task::spawn_blocking(move || handle.block_on(fut))
                    .await
                    .map_err(|e| ServiceError::Execution(e.to_string()))?
            }
        }
    }
}

impl fmt::Display for ExecutionStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised style segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStyle(pub String);

impl fmt::Display for UnknownStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown style '{}'", self.0)
    }
}

impl std::error::Error for UnknownStyle {}

impl FromStr for ExecutionStyle {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExecutionStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| UnknownStyle(s.to_string()))
    }
}
