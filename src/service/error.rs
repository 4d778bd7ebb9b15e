use thiserror::Error;

use crate::storage::StoreError;
use crate::upstream::FetchError;

/// Boundary-visible failure of a facade operation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The remote has no such operation.
    #[error("{0}")]
    NotFound(#[source] FetchError),

    /// The remote could not serve the call (open breaker, timeout, 5xx, transport).
    #[error("upstream unavailable: {0}")]
    Upstream(#[source] FetchError),

    /// The store could not be reached or rejected the statement.
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// The task running the request did not complete.
    #[error("request execution failed: {0}")]
    Execution(String),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::NotFound(_))
    }

    /// Label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Upstream(e) => e.kind(),
            ServiceError::Storage(_) => "storage_unavailable",
            ServiceError::Execution(_) => "execution_failed",
        }
    }
}

impl From<FetchError> for ServiceError {
    fn from(err: FetchError) -> Self {
        if err.is_not_found() {
            ServiceError::NotFound(err)
        } else {
            ServiceError::Upstream(err)
        }
    }
}
