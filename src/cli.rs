//! Command-line argument surface.

use chrono::{NaiveDate, Utc};
use clap::Parser;
use std::path::PathBuf;

use crate::collector::config::{
    CollectorConfig, DEFAULT_MAX_RETRIES, DEFAULT_PAGE_SIZE, DEFAULT_WINDOW_DAYS,
};

/// Bulk time-windowed collection of an account's feed history.
#[derive(Debug, Parser)]
#[command(name = "feed-harvester", version, about)]
pub struct Cli {
    /// Account whose posts to collect
    pub subject: String,

    /// First day of the overall range (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: NaiveDate,

    /// End of the overall range, exclusive (YYYY-MM-DD); defaults to today UTC
    #[arg(long)]
    pub end_date: Option<NaiveDate>,

    /// Days covered by one collection window
    #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS)]
    pub window_days: u32,

    /// Consecutive transient failures tolerated per window
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Posts requested per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Directory for per-window CSV files
    #[arg(long, default_value = "data")]
    pub output_dir: PathBuf,

    /// JSON cookie file holding the authenticated session
    #[arg(long, default_value = "cookies.json")]
    pub cookies: PathBuf,

    /// Base URL of the feed search API
    #[arg(long)]
    pub base_url: String,

    /// Disable the per-window activity probe
    #[arg(long)]
    pub no_probe: bool,

    /// Skip full pagination for windows where the probe finds nothing
    #[arg(long, conflicts_with = "no_probe")]
    pub skip_quiet: bool,
}

impl Cli {
    /// Collection parameters derived from the arguments.
    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            window_days: self.window_days,
            max_retries: self.max_retries,
            page_size: self.page_size,
            probe: !self.no_probe,
            skip_quiet_windows: self.skip_quiet,
        }
    }

    /// End date, defaulting to today (UTC) when not given.
    pub fn resolved_end_date(&self) -> NaiveDate {
        self.end_date.unwrap_or_else(|| Utc::now().date_naive())
    }
}
