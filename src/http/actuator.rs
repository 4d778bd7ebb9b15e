//! Status endpoints for operators.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::resilience::BreakerSnapshot;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "UP",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn circuit_breaker(State(state): State<AppState>) -> Json<BreakerSnapshot> {
    Json(state.service.breaker_snapshot())
}
