//! Observability module for the Postal client.
//!
//! The client emits `tracing` spans and events; this module offers a
//! default subscriber setup and a small timer for elapsed-time fields.

mod logging;

pub use logging::{init_logging, LogConfig, LogLevel};

use std::time::{Duration, Instant};

/// Request timer for measuring operation duration.
#[derive(Debug)]
pub struct RequestTimer {
    start: Instant,
    operation: &'static str,
}

impl RequestTimer {
    /// Creates a new request timer.
    pub fn new(operation: &'static str) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Returns the elapsed time.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Returns the operation name.
    pub fn operation(&self) -> &'static str {
        self.operation
    }
}
