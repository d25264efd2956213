//! Run lifecycle controller.
//!
//! Top-level entry for one collection run: owns the [`RunState`], delegates
//! to the window scheduler, and turns any uncaught failure into a terminal
//! report that carries the partial total instead of a bare crash.

use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{error, info};

use crate::client::FeedClient;
use crate::collector::{CollectorConfig, CollectorError, RunState, WindowScheduler};
use crate::shutdown::SharedShutdown;

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Records written across all windows
    pub total_records: u64,
    /// Windows driven to completion
    pub windows_completed: usize,
}

/// Terminal failure report: what went wrong plus everything durably written
/// before it did.
#[derive(Debug)]
pub struct RunFailure {
    /// Records written before the failure
    pub total_records: u64,
    /// The underlying failure
    pub error: CollectorError,
}

impl std::fmt::Display for RunFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "run failed after {} records: {}",
            self.total_records, self.error
        )
    }
}

impl std::error::Error for RunFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// One-shot collection run over a configured client.
pub struct Harvester<C: FeedClient> {
    client: C,
    config: CollectorConfig,
    output_dir: PathBuf,
    shutdown: SharedShutdown,
}

impl<C: FeedClient> Harvester<C> {
    /// Assemble a harvester from its collaborators.
    pub fn new(
        client: C,
        config: CollectorConfig,
        output_dir: PathBuf,
        shutdown: SharedShutdown,
    ) -> Self {
        Self {
            client,
            config,
            output_dir,
            shutdown,
        }
    }

    /// Collect `subject` over `[start, end)` and summarize.
    pub async fn execute(
        &self,
        subject: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<RunSummary, RunFailure> {
        let scheduler = WindowScheduler::new(
            &self.client,
            &self.config,
            self.output_dir.clone(),
            &self.shutdown,
        );

        let mut state = RunState::default();
        match scheduler.run(subject, start, end, &mut state).await {
            Ok(()) => {
                info!(
                    subject,
                    total = state.total_records,
                    windows = state.windows_completed,
                    "collection run finished"
                );
                Ok(RunSummary {
                    total_records: state.total_records,
                    windows_completed: state.windows_completed,
                })
            }
            Err(error) => {
                error!(
                    subject,
                    total = state.total_records,
                    error = %error,
                    "collection run failed"
                );
                Err(RunFailure {
                    total_records: state.total_records,
                    error,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputError;

    #[test]
    fn failure_report_includes_partial_total() {
        let failure = RunFailure {
            total_records: 42,
            error: CollectorError::Output(OutputError::Io("disk full".to_string())),
        };
        let rendered = failure.to_string();
        assert!(rendered.contains("42 records"));
        assert!(rendered.contains("disk full"));
    }
}
