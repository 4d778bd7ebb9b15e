//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Call to the remote dependency:
//!     → circuit_breaker.rs (acquire permit or fail fast)
//!     → timeouts.rs (race the call against its deadline)
//!     → circuit_breaker.rs (record success / slow / failure, maybe transition)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every remote call has a deadline
//! - No retries: one attempt per invocation, callers retry by calling again
//! - Circuit breaker prevents hammering a failing dependency

pub mod circuit_breaker;
pub mod timeouts;

pub use circuit_breaker::{BreakerSnapshot, CallOutcome, CallPermit, CircuitBreaker, CircuitState};
pub use timeouts::TimeLimiter;
