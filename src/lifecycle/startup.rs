//! Startup orchestration.
//!
//! Builds the subsystems in dependency order: breaker, remote client, store,
//! then the facade that ties them together. Any failure here is fatal.

use std::sync::Arc;

use thiserror::Error;

use crate::config::SandboxConfig;
use crate::resilience::CircuitBreaker;
use crate::service::FetchService;
use crate::storage::{StoreError, TextStore};
use crate::upstream::{FetchError, ResilientClient};

/// Name of the breaker guarding the configured remote.
pub const UPSTREAM_BREAKER: &str = "upstream";

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build remote client: {0}")]
    Client(#[from] FetchError),

    #[error("failed to open store: {0}")]
    Store(#[from] StoreError),
}

/// Build the facade with a store opened from `config.database`.
pub async fn build_service(config: &SandboxConfig) -> Result<FetchService, StartupError> {
    let store = TextStore::connect(&config.database).await?;
    build_service_with_store(config, store)
}

/// Build the facade around an already opened store.
pub fn build_service_with_store(
    config: &SandboxConfig,
    store: TextStore,
) -> Result<FetchService, StartupError> {
    let breaker = Arc::new(CircuitBreaker::new(
        UPSTREAM_BREAKER,
        config.circuit_breaker.clone(),
    ));
    let client = ResilientClient::new(&config.upstream, breaker)?;

    tracing::info!(
        upstream = %config.upstream.base_url(),
        timeout_ms = config.upstream.timeout_ms,
        window = config.circuit_breaker.sliding_window_size,
        minimum_calls = config.circuit_breaker.minimum_number_of_calls,
        failure_rate_threshold = config.circuit_breaker.failure_rate_threshold,
        "Remote client initialized"
    );

    Ok(FetchService::new(client, store))
}
