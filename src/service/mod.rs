//! Request handler facade.
//!
//! # Data Flow
//! ```text
//! fetch(op)            → upstream::ResilientClient::fetch → body
//! fetch_and_store(op)  → fetch(op) → storage::TextStore::insert → id
//! ```
//!
//! # Design Decisions
//! - Stateless per call; the only shared state is the breaker and the pool
//! - No local recovery: every failure reaches the boundary, classified as
//!   either not-found or unavailable

mod error;

pub use error::ServiceError;

use futures_util::stream::{BoxStream, StreamExt};

use crate::resilience::BreakerSnapshot;
use crate::storage::{TextRecord, TextStore};
use crate::upstream::ResilientClient;

/// The operations the HTTP layer exposes, whatever the execution style.
#[derive(Debug, Clone)]
pub struct FetchService {
    client: ResilientClient,
    store: TextStore,
}

impl FetchService {
    pub fn new(client: ResilientClient, store: TextStore) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> &TextStore {
        &self.store
    }

    /// Fetch remote content without storing it.
    pub async fn fetch(&self, operation: &str) -> Result<String, ServiceError> {
        Ok(self.client.fetch(operation).await?)
    }

    /// Fetch remote content and store it; returns the new record id.
    pub async fn fetch_and_store(&self, operation: &str) -> Result<i64, ServiceError> {
        let body = self.client.fetch(operation).await?;
        let id = self.store.insert(&body).await?;
        tracing::info!(operation = %operation, id, "Stored remote content");
        Ok(id)
    }

    pub fn list_all(&self) -> BoxStream<'_, Result<TextRecord, ServiceError>> {
        self.store
            .list_all()
            .map(|item| item.map_err(ServiceError::from))
            .boxed()
    }

    pub async fn clear(&self) -> Result<u64, ServiceError> {
        Ok(self.store.clear().await?)
    }

    pub async fn fill_with_samples(&self, count: usize) -> Result<(), ServiceError> {
        Ok(self.store.fill_with_samples(count).await?)
    }

    pub fn breaker_snapshot(&self) -> BreakerSnapshot {
        self.client.breaker().snapshot()
    }
}
