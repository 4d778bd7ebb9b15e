//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and cross-field
//! consistency. Every problem is reported, not just the first.

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::SandboxConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed configuration.
pub fn validate_config(config: &SandboxConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let upstream = &config.upstream;
    if upstream.host.trim().is_empty() {
        errors.push(ValidationError::new("upstream.host", "must not be empty"));
    } else if url::Url::parse(&upstream.base_url()).is_err() {
        errors.push(ValidationError::new(
            "upstream.host",
            format!("'{}' does not form a valid URL", upstream.base_url()),
        ));
    }
    if upstream.port == 0 {
        errors.push(ValidationError::new("upstream.port", "must be greater than 0"));
    }
    if upstream.timeout_ms == 0 {
        errors.push(ValidationError::new("upstream.timeout_ms", "must be greater than 0"));
    }

    let cb = &config.circuit_breaker;
    if cb.sliding_window_size == 0 {
        errors.push(ValidationError::new(
            "circuit_breaker.sliding_window_size",
            "must be greater than 0",
        ));
    }
    if cb.minimum_number_of_calls == 0 {
        errors.push(ValidationError::new(
            "circuit_breaker.minimum_number_of_calls",
            "must be greater than 0",
        ));
    }
    if !(cb.failure_rate_threshold > 0.0 && cb.failure_rate_threshold <= 100.0) {
        errors.push(ValidationError::new(
            "circuit_breaker.failure_rate_threshold",
            format!("{} is outside (0, 100]", cb.failure_rate_threshold),
        ));
    }
    if cb.permitted_number_of_calls_in_half_open_state == 0 {
        errors.push(ValidationError::new(
            "circuit_breaker.permitted_number_of_calls_in_half_open_state",
            "must be greater than 0",
        ));
    }
    if cb.slow_call_duration_threshold_ms == 0 {
        errors.push(ValidationError::new(
            "circuit_breaker.slow_call_duration_threshold_ms",
            "must be greater than 0",
        ));
    }

    if config.database.url.trim().is_empty() {
        errors.push(ValidationError::new("database.url", "must not be empty"));
    }
    if config.database.max_connections == 0 {
        errors.push(ValidationError::new(
            "database.max_connections",
            "must be greater than 0",
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    let obs = &config.observability;
    if obs.metrics_enabled && obs.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", obs.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
