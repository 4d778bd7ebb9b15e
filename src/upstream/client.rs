//! Outbound HTTP client guarded by the circuit breaker and time limiter.
//!
//! # Responsibilities
//! - Build `http://<host>:<port>/<operation>` and GET it with JSON accept
//! - Fail fast when the breaker is open
//! - Bound send + body read by the time limiter
//! - Report every completed attempt back to the breaker
//!
//! # Design Decisions
//! - One attempt per call; retrying is the caller's business
//! - The attempt runs on its own task, so a caller that goes away does not
//!   cancel the remote call or lose its breaker outcome

use std::sync::Arc;
use std::time::Instant;

use reqwest::header::ACCEPT;

use crate::config::UpstreamConfig;
use crate::observability::metrics;
use crate::resilience::{CallPermit, CircuitBreaker, TimeLimiter};
use crate::upstream::error::FetchError;

/// Resilient client for one remote dependency.
#[derive(Debug, Clone)]
pub struct ResilientClient {
    http: reqwest::Client,
    base_url: String,
    breaker: Arc<CircuitBreaker>,
    limiter: TimeLimiter,
}

impl ResilientClient {
    pub fn new(config: &UpstreamConfig, breaker: Arc<CircuitBreaker>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .no_proxy()
            .build()
            .map_err(FetchError::Transport)?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            breaker,
            limiter: TimeLimiter::new(config.timeout()),
        })
    }

    pub fn breaker(&self) -> &Arc<CircuitBreaker> {
        &self.breaker
    }

    pub fn target_url(&self, operation: &str) -> String {
        format!("{}/{}", self.base_url, operation)
    }

    /// GET `operation` from the remote and return the body text.
    pub async fn fetch(&self, operation: &str) -> Result<String, FetchError> {
        if operation.is_empty() {
            return Err(FetchError::InvalidOperation);
        }

        let Some(permit) = self.breaker.try_acquire() else {
            tracing::warn!(
                breaker = %self.breaker.name(),
                operation = %operation,
                "Circuit open, rejecting call"
            );
            metrics::record_upstream_rejection();
            return Err(FetchError::CircuitOpen);
        };

        let client = self.clone();
        let operation = operation.to_string();
        tokio::spawn(async move { client.attempt(permit, &operation).await })
            .await
            .map_err(|e| FetchError::Aborted(e.to_string()))?
    }

    async fn attempt(&self, permit: CallPermit, operation: &str) -> Result<String, FetchError> {
        let url = self.target_url(operation);
        let start = Instant::now();

        let result = match self.limiter.run(self.get(&url, operation)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::TimedOut(self.limiter.timeout())),
        };
        let elapsed = start.elapsed();

        match &result {
            Ok(body) => {
                self.breaker.on_success(permit, elapsed);
                metrics::record_upstream_call("success", start);
                tracing::debug!(
                    url = %url,
                    elapsed_ms = elapsed.as_millis() as u64,
                    bytes = body.len(),
                    "Remote call succeeded"
                );
            }
            Err(e) => {
                self.breaker.on_failure(permit);
                metrics::record_upstream_call(e.kind(), start);
                tracing::warn!(
                    url = %url,
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "Remote call failed"
                );
            }
        }

        result
    }

    async fn get(&self, url: &str, operation: &str) -> Result<String, FetchError> {
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status();
        if status.is_success() {
            response.text().await.map_err(FetchError::Transport)
        } else if status.is_client_error() {
            Err(FetchError::RemoteNotFound(operation.to_string()))
        } else {
            Err(FetchError::RemoteStatus(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CircuitBreakerConfig;

    fn client(port: u16) -> ResilientClient {
        let config = UpstreamConfig {
            host: "127.0.0.1".into(),
            port,
            ..UpstreamConfig::default()
        };
        let breaker = Arc::new(CircuitBreaker::new("test", CircuitBreakerConfig::default()));
        ResilientClient::new(&config, breaker).unwrap()
    }

    #[test]
    fn test_target_url_uses_operation_verbatim() {
        let client = client(9090);
        assert_eq!(client.target_url("slow-json"), "http://127.0.0.1:9090/slow-json");
        assert_eq!(client.target_url("a/b?c=1"), "http://127.0.0.1:9090/a/b?c=1");
    }

    #[tokio::test]
    async fn test_empty_operation_rejected_before_breaker() {
        let client = client(9);
        for _ in 0..5 {
            let err = client.fetch("").await.unwrap_err();
            assert!(matches!(err, FetchError::InvalidOperation));
        }
        assert_eq!(client.breaker().snapshot().buffered_calls, 0);
    }
}
