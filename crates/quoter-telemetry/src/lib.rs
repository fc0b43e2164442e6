//! Structured logging and Prometheus metrics for the perp quoter.
//!
//! - JSON logging with tracing (pretty output in development)
//! - Counters for cycle health: completions, skips, submissions, rejects

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
