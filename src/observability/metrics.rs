//! Metrics collection and exposition.
//!
//! # Metrics
//! - `http_requests_total` (counter): inbound requests by route, status
//! - `http_request_duration_seconds` (histogram): inbound latency
//! - `upstream_calls_total` (counter): remote calls by outcome
//! - `upstream_call_duration_seconds` (histogram): remote call latency
//! - `circuit_breaker_state` (gauge): 0=closed, 1=half-open, 2=open
//! - `circuit_breaker_transitions_total` (counter): transitions by target state
//! - `records_inserted_total` (counter): rows written to the store
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::resilience::CircuitState;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(route: String, status: u16, start: Instant) {
    histogram!("http_request_duration_seconds", "route" => route.clone())
        .record(start.elapsed().as_secs_f64());
    counter!("http_requests_total", "route" => route, "status" => status.to_string()).increment(1);
}

pub fn record_upstream_call(outcome: &'static str, start: Instant) {
    counter!("upstream_calls_total", "outcome" => outcome).increment(1);
    histogram!("upstream_call_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// A call the breaker refused; no remote latency to report.
pub fn record_upstream_rejection() {
    counter!("upstream_calls_total", "outcome" => "circuit_open").increment(1);
}

pub fn record_breaker_state(name: &str, state: CircuitState) {
    let value = match state {
        CircuitState::Closed => 0.0,
        CircuitState::HalfOpen => 1.0,
        CircuitState::Open => 2.0,
    };
    gauge!("circuit_breaker_state", "breaker" => name.to_string()).set(value);
}

pub fn record_breaker_transition(name: &str, to: CircuitState) {
    counter!(
        "circuit_breaker_transitions_total",
        "breaker" => name.to_string(),
        "to" => to.as_str()
    )
    .increment(1);
    record_breaker_state(name, to);
}

pub fn record_inserts(count: u64) {
    counter!("records_inserted_total").increment(count);
}
