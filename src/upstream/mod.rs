//! Remote dependency subsystem.
//!
//! # Data Flow
//! ```text
//! operation
//!     → client.rs (breaker permit → timed GET → classify)
//!     → error.rs (CircuitOpen / TimedOut / RemoteNotFound / RemoteStatus / Transport)
//! ```

pub mod client;
pub mod error;

pub use client::ResilientClient;
pub use error::FetchError;
