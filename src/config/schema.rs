//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the sandbox.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the sandbox service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SandboxConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Remote dependency the fetch endpoints call.
    pub upstream: UpstreamConfig,

    /// Circuit breaker guarding the remote dependency.
    pub circuit_breaker: CircuitBreakerConfig,

    /// Relational store settings.
    pub database: DatabaseConfig,

    /// Inbound request timeouts.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Remote dependency configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Remote host name or IP.
    pub host: String,

    /// Remote port.
    pub port: u16,

    /// Time limit for a single call (send + body) in milliseconds.
    pub timeout_ms: u64,

    /// User-Agent header sent on outbound calls.
    pub user_agent: String,
}

impl UpstreamConfig {
    /// Base URL every operation is appended to, without trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9090,
            timeout_ms: 100,
            user_agent: concat!("flux-sandbox/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Circuit breaker configuration.
///
/// Names follow the usual resilience vocabulary so values can be carried over
/// from other deployments unchanged.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitBreakerConfig {
    /// Number of most recent outcomes kept in the count-based window.
    pub sliding_window_size: usize,

    /// Outcomes required in the window before the failure rate is evaluated.
    pub minimum_number_of_calls: usize,

    /// Failure-or-slow percentage (0-100] at which the breaker opens.
    pub failure_rate_threshold: f32,

    /// How long the breaker stays open before admitting trial calls.
    pub wait_duration_in_open_state_ms: u64,

    /// Successful calls slower than this are recorded as slow.
    pub slow_call_duration_threshold_ms: u64,

    /// Trial calls admitted while half-open; all must succeed to close.
    pub permitted_number_of_calls_in_half_open_state: usize,
}

impl CircuitBreakerConfig {
    pub fn wait_duration_in_open_state(&self) -> Duration {
        Duration::from_millis(self.wait_duration_in_open_state_ms)
    }

    pub fn slow_call_duration_threshold(&self) -> Duration {
        Duration::from_millis(self.slow_call_duration_threshold_ms)
    }
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            sliding_window_size: 5,
            minimum_number_of_calls: 2,
            failure_rate_threshold: 50.0,
            wait_duration_in_open_state_ms: 10_000,
            slow_call_duration_threshold_ms: 2_000,
            permitted_number_of_calls_in_half_open_state: 2,
        }
    }
}

/// Relational store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL (e.g., "sqlite:sandbox.db?mode=rwc").
    pub url: String,

    /// Maximum pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:sandbox.db?mode=rwc".to_string(),
            max_connections: 5,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time to produce a response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Human-readable or JSON log lines.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9100".to_string(),
        }
    }
}
