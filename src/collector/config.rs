//! Collection configuration constants.

use std::ops::RangeInclusive;
use std::time::Duration;

/// Days covered by one collection window.
/// 180 days keeps the per-window result set small enough that an abandoned
/// window loses a bounded amount of work.
pub const DEFAULT_WINDOW_DAYS: u32 = 180;

/// Maximum consecutive transient failures tolerated inside one window before
/// the window is abandoned. Rate limits do not count.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Posts requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Safety margin added on top of the provider's rate-limit reset time.
pub const RATE_LIMIT_SAFETY_MARGIN: Duration = Duration::from_secs(5);

/// Floor for the rate-limit wait when the reset time is already in the past.
pub const MIN_RATE_LIMIT_WAIT: Duration = Duration::from_secs(1);

/// Jitter added to the exponential transient backoff, in whole seconds.
pub const TRANSIENT_JITTER_SECS: RangeInclusive<u64> = 1..=5;

/// Pause between page fetches within a window, in whole seconds.
pub const PAGE_PACING_SECS: RangeInclusive<u64> = 3..=7;

/// Pause between completed windows, in whole seconds.
pub const WINDOW_PACING_SECS: RangeInclusive<u64> = 5..=10;

/// Tunable collection parameters.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Days per window
    pub window_days: u32,
    /// Transient retry budget per window
    pub max_retries: u32,
    /// Posts requested per page
    pub page_size: u32,
    /// Run the single-post activity probe before paginating each window
    pub probe: bool,
    /// Skip full pagination for windows where the probe finds nothing.
    /// Off by default: the probe can false-negative, so skipping trades
    /// completeness for speed.
    pub skip_quiet_windows: bool,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
            max_retries: DEFAULT_MAX_RETRIES,
            page_size: DEFAULT_PAGE_SIZE,
            probe: true,
            skip_quiet_windows: false,
        }
    }
}
