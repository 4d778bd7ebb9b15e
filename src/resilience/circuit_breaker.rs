//! Circuit breaker for the remote dependency.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: dependency assumed down, calls fail fast
//! - Half-Open: a limited number of trial calls probe for recovery
//!
//! # State Transitions
//! ```text
//! Closed → Open: window holds >= minimum calls and failure-or-slow rate >= threshold
//! Open → Half-Open: after wait duration (checked lazily on next acquire/query)
//! Half-Open → Closed: all permitted trial calls succeed
//! Half-Open → Open: any trial call fails or is slow
//! ```
//!
//! # Design Decisions
//! - Count-based sliding window, cleared on every transition
//! - One mutex guards state and window so transitions see a consistent view
//! - Each transition starts a new epoch; outcomes from permits issued in an
//!   earlier epoch are dropped

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::config::CircuitBreakerConfig;
use crate::observability::metrics;

/// Circuit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CircuitState::Closed => "CLOSED",
            CircuitState::Open => "OPEN",
            CircuitState::HalfOpen => "HALF_OPEN",
        }
    }
}

impl fmt::Display for CircuitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one completed call, as kept in the sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Success,
    Failure,
    Slow,
}

impl CallOutcome {
    fn is_bad(self) -> bool {
        !matches!(self, CallOutcome::Success)
    }
}

/// Permission to make one call. Hand it back via [`CircuitBreaker::record`].
#[derive(Debug, Clone, Copy)]
#[must_use = "a permit must be recorded or the outcome is lost"]
pub struct CallPermit {
    epoch: u64,
}

/// Point-in-time view of the breaker for status endpoints and logs.
#[derive(Debug, Clone, Serialize)]
pub struct BreakerSnapshot {
    pub name: String,
    pub state: CircuitState,
    pub buffered_calls: usize,
    pub failed_calls: usize,
    /// Percentage of failed or slow calls; `None` until the minimum is reached.
    pub failure_rate: Option<f32>,
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    window: VecDeque<CallOutcome>,
    opened_at: Option<Instant>,
    half_open_admitted: usize,
    half_open_successes: usize,
    epoch: u64,
}

/// Shared circuit breaker. Wrap in `Arc` and inject where calls are made.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        let name = name.into();
        metrics::record_breaker_state(&name, CircuitState::Closed);
        Self {
            name,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                window: VecDeque::with_capacity(config.sliding_window_size),
                opened_at: None,
                half_open_admitted: 0,
                half_open_successes: 0,
                epoch: 0,
            }),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current state, after applying any due Open → Half-Open transition.
    pub fn state(&self) -> CircuitState {
        let mut inner = self.lock();
        self.maybe_half_open(&mut inner);
        inner.state
    }

    /// Ask to make a call. `None` means the breaker rejects it.
    pub fn try_acquire(&self) -> Option<CallPermit> {
        let mut inner = self.lock();
        self.maybe_half_open(&mut inner);

        match inner.state {
            CircuitState::Closed => Some(CallPermit { epoch: inner.epoch }),
            CircuitState::Open => None,
            CircuitState::HalfOpen => {
                let permitted = self.config.permitted_number_of_calls_in_half_open_state;
                if inner.half_open_admitted < permitted {
                    inner.half_open_admitted += 1;
                    Some(CallPermit { epoch: inner.epoch })
                } else {
                    None
                }
            }
        }
    }

    /// Record a successful call, classifying it as slow if it took too long.
    pub fn on_success(&self, permit: CallPermit, elapsed: Duration) {
        let outcome = if elapsed > self.config.slow_call_duration_threshold() {
            CallOutcome::Slow
        } else {
            CallOutcome::Success
        };
        self.record(permit, outcome);
    }

    pub fn on_failure(&self, permit: CallPermit) {
        self.record(permit, CallOutcome::Failure);
    }

    /// Record an outcome against the window and apply any transition it causes.
    pub fn record(&self, permit: CallPermit, outcome: CallOutcome) {
        let mut inner = self.lock();

        if permit.epoch != inner.epoch {
            tracing::debug!(
                breaker = %self.name,
                permit_epoch = permit.epoch,
                current_epoch = inner.epoch,
                ?outcome,
                "Discarding outcome from an earlier breaker epoch"
            );
            return;
        }

        match inner.state {
            CircuitState::Closed => {
                if inner.window.len() == self.config.sliding_window_size {
                    inner.window.pop_front();
                }
                inner.window.push_back(outcome);

                if let Some(rate) = self.failure_rate(&inner) {
                    if rate >= self.config.failure_rate_threshold {
                        tracing::warn!(
                            breaker = %self.name,
                            failure_rate = rate,
                            threshold = self.config.failure_rate_threshold,
                            "Failure rate threshold reached"
                        );
                        self.transition(&mut inner, CircuitState::Open);
                    }
                }
            }
            CircuitState::HalfOpen => {
                if outcome.is_bad() {
                    self.transition(&mut inner, CircuitState::Open);
                } else {
                    inner.half_open_successes += 1;
                    if inner.half_open_successes
                        >= self.config.permitted_number_of_calls_in_half_open_state
                    {
                        self.transition(&mut inner, CircuitState::Closed);
                    }
                }
            }
            // Permits are never issued while open within the same epoch.
            CircuitState::Open => {}
        }
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        let mut inner = self.lock();
        self.maybe_half_open(&mut inner);
        BreakerSnapshot {
            name: self.name.clone(),
            state: inner.state,
            buffered_calls: inner.window.len(),
            failed_calls: inner.window.iter().filter(|o| o.is_bad()).count(),
            failure_rate: self.failure_rate(&inner),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn failure_rate(&self, inner: &Inner) -> Option<f32> {
        let minimum = self
            .config
            .minimum_number_of_calls
            .min(self.config.sliding_window_size);
        let total = inner.window.len();
        if total == 0 || total < minimum {
            return None;
        }
        let bad = inner.window.iter().filter(|o| o.is_bad()).count();
        Some(bad as f32 * 100.0 / total as f32)
    }

    fn maybe_half_open(&self, inner: &mut Inner) {
        if inner.state != CircuitState::Open {
            return;
        }
        let due = inner
            .opened_at
            .map(|at| at.elapsed() >= self.config.wait_duration_in_open_state())
            .unwrap_or(true);
        if due {
            self.transition(inner, CircuitState::HalfOpen);
        }
    }

    fn transition(&self, inner: &mut Inner, to: CircuitState) {
        let from = inner.state;
        inner.state = to;
        inner.window.clear();
        inner.half_open_admitted = 0;
        inner.half_open_successes = 0;
        inner.epoch += 1;
        inner.opened_at = (to == CircuitState::Open).then(Instant::now);

        tracing::info!(
            breaker = %self.name,
            from = %from,
            to = %to,
            epoch = inner.epoch,
            "Circuit breaker state transition"
        );
        metrics::record_breaker_transition(&self.name, to);
    }
}
