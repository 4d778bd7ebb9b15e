//! Persistence subsystem.
//!
//! # Data Flow
//! ```text
//! fetched body
//!     → record.rs (truncate to 100 chars)
//!     → store.rs (INSERT, id assigned by SQLite)
//!
//! /db/all
//!     → store.rs (streamed SELECT in id order)
//! ```

pub mod record;
pub mod store;

pub use record::{TextRecord, MAX_CONTENT_CHARS};
pub use store::{StoreError, StoreResult, TextStore};
