//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, span)
//!     → handlers.rs / ping.rs / actuator.rs
//!         → style.rs (drive the facade call in the requested style)
//!     → response.rs (map failures to 404 / 500)
//!     → Send to client
//! ```

pub mod actuator;
pub mod handlers;
pub mod ping;
pub mod request;
pub mod response;
pub mod server;
pub mod style;

pub use request::X_REQUEST_ID;
pub use response::ApiError;
pub use server::{AppState, HttpServer};
pub use style::ExecutionStyle;
