//! Collection control subsystem.
//!
//! This is the part with real state-machine and failure-handling logic:
//!
//! 1. **Window partitioning**: [`window`] splits the overall date range into
//!    fixed-size windows
//! 2. **Pagination**: [`driver`] walks one window's pages to completion,
//!    classifying errors and backing off per [`backoff`]
//! 3. **Recording**: [`recorder`] assigns run-wide sequence numbers and
//!    appends each page to the window's sink
//! 4. **Scheduling**: [`scheduler`] sequences windows, pacing, and totals
//!
//! Fetch errors never escape the driver; the only errors that propagate out
//! of this module come from collaborators (sink I/O) breaking their contract.

pub mod backoff;
pub mod config;
pub mod driver;
pub mod probe;
pub mod recorder;
pub mod scheduler;
pub mod window;

pub use config::CollectorConfig;
pub use scheduler::{RunState, WindowScheduler};

use crate::output::OutputError;

/// Collector errors.
#[derive(Debug, thiserror::Error)]
pub enum CollectorError {
    /// Sink failure while persisting a page
    #[error("output error: {0}")]
    Output(#[from] OutputError),

    /// Requested date range cannot be partitioned
    #[error("invalid range: {0}")]
    InvalidRange(String),
}
