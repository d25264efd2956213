//! Window scheduler.
//!
//! Partitions the overall date range into windows, processes them strictly
//! sequentially, and aggregates per-window counts into the run total. The
//! remote source enforces a single shared rate-limit budget, so there is
//! nothing to gain from concurrent windows.

use std::path::PathBuf;
use tracing::info;

use super::config::CollectorConfig;
use super::recorder::BatchRecorder;
use super::window::{partition, DateWindow};
use super::{backoff, driver, probe, CollectorError};
use crate::client::FeedClient;
use crate::output::csv::{window_file_name, CsvWindowSink};
use crate::shutdown::ShutdownCoordinator;
use chrono::NaiveDate;

/// Mutable run progress, exclusively owned by the run controller.
///
/// `total_records` only ever grows; it equals the sum of rows appended to
/// every window's output so far, surviving window abandonment and early
/// shutdown.
#[derive(Debug, Default)]
pub struct RunState {
    /// Records written across all windows so far
    pub total_records: u64,
    /// Windows driven to completion (including abandoned ones)
    pub windows_completed: usize,
}

/// Sequences windows for one collection run.
pub struct WindowScheduler<'a, C: FeedClient + ?Sized> {
    client: &'a C,
    config: &'a CollectorConfig,
    output_dir: PathBuf,
    shutdown: &'a ShutdownCoordinator,
}

impl<'a, C: FeedClient + ?Sized> WindowScheduler<'a, C> {
    /// Create a scheduler writing window files under `output_dir`.
    pub fn new(
        client: &'a C,
        config: &'a CollectorConfig,
        output_dir: PathBuf,
        shutdown: &'a ShutdownCoordinator,
    ) -> Self {
        Self {
            client,
            config,
            output_dir,
            shutdown,
        }
    }

    /// Collect `subject` over `[overall_start, overall_end)`, accumulating
    /// into `state`.
    ///
    /// Window-level fetch failures are absorbed by the pagination driver;
    /// only collaborator failures (sink I/O) propagate, terminating the run
    /// with `state` still reflecting everything written so far.
    pub async fn run(
        &self,
        subject: &str,
        overall_start: NaiveDate,
        overall_end: NaiveDate,
        state: &mut RunState,
    ) -> Result<(), CollectorError> {
        if overall_start >= overall_end {
            return Err(CollectorError::InvalidRange(format!(
                "start date {overall_start} must be before end date {overall_end}"
            )));
        }

        let windows = partition(overall_start, overall_end, self.config.window_days);
        info!(
            subject,
            windows = windows.len(),
            window_days = self.config.window_days,
            "starting collection run"
        );

        for (index, window) in windows.iter().enumerate() {
            if self.shutdown.is_shutdown_requested() {
                info!(remaining = windows.len() - index, "shutdown requested, stopping run");
                break;
            }

            self.process_window(subject, window, state).await?;

            let more_windows = index + 1 < windows.len();
            if more_windows && self.shutdown.sleep_interruptible(backoff::window_wait()).await {
                break;
            }
        }

        Ok(())
    }

    async fn process_window(
        &self,
        subject: &str,
        window: &DateWindow,
        state: &mut RunState,
    ) -> Result<(), CollectorError> {
        let path = self.output_dir.join(window_file_name(window.start, window.end));
        let sink = CsvWindowSink::create(&path)?;
        let mut recorder = BatchRecorder::new(sink);

        if self.config.probe {
            let active = probe::probe(self.client, subject, window).await;
            if !active {
                if self.config.skip_quiet_windows {
                    info!(window = %window, "no activity detected, skipping window");
                    return Ok(());
                }
                // Probe can false-negative, so paginate anyway
                info!(window = %window, "no activity detected, paginating anyway");
            }
        }

        let count = driver::collect(
            self.client,
            subject,
            window,
            &mut recorder,
            state.total_records,
            self.config,
            self.shutdown,
        )
        .await?;

        state.total_records += count;
        state.windows_completed += 1;
        info!(
            window = %window,
            records = count,
            total = state.total_records,
            "window complete"
        );
        Ok(())
    }
}
