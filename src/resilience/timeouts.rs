//! Timeout enforcement.
//!
//! # Responsibilities
//! - Race a remote call against a fixed deadline
//! - Drop the in-flight future when the deadline wins, so a late result can
//!   never surface
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors

use std::future::Future;
use std::time::Duration;

use tokio::time::error::Elapsed;

/// Bounds how long a single call may take.
#[derive(Debug, Clone, Copy)]
pub struct TimeLimiter {
    timeout: Duration,
}

impl TimeLimiter {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Run `fut`, giving up once the configured duration has elapsed.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Elapsed> {
        tokio::time::timeout(self.timeout, fut).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_fast_future_completes() {
        let limiter = TimeLimiter::new(Duration::from_millis(100));
        let value = limiter
            .run(async {
                tokio::time::sleep(Duration::from_millis(50)).await;
                7
            })
            .await;
        assert_eq!(value.unwrap(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_future_is_dropped() {
        let limiter = TimeLimiter::new(Duration::from_millis(100));
        let finished = Arc::new(AtomicBool::new(false));
        let flag = finished.clone();

        let result = limiter
            .run(async move {
                tokio::time::sleep(Duration::from_millis(500)).await;
                flag.store(true, Ordering::SeqCst);
            })
            .await;
        assert!(result.is_err());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!finished.load(Ordering::SeqCst), "late work must not run");
    }
}
