//! Reactive-style HTTP sandbox: fetch remote content through a circuit
//! breaker and time limiter, optionally persisting it.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod service;
pub mod storage;
pub mod upstream;

pub use config::schema::SandboxConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use service::{FetchService, ServiceError};
