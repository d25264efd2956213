//! Date windows and range partitioning.

use chrono::{Duration, NaiveDate};

/// One contiguous date sub-range, processed as a single pagination unit.
///
/// Query bounds are date-inclusive on both ends, matching the feed's
/// `since:`/`until:` search syntax. Immutable once created; consumed by
/// exactly one pagination driver invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    /// First day covered by the window
    pub start: NaiveDate,
    /// Last day covered by the window
    pub end: NaiveDate,
}

impl DateWindow {
    /// Window length in days.
    pub fn days(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_days()
    }
}

impl std::fmt::Display for DateWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Partition `[overall_start, overall_end)` into consecutive windows of
/// `window_days`, the final window truncated at `overall_end`.
///
/// Successive windows start one day after the previous window's end, so the
/// inclusive query ranges tile the overall span without overlap. Returns an
/// empty vector when `overall_start >= overall_end`.
pub fn partition(overall_start: NaiveDate, overall_end: NaiveDate, window_days: u32) -> Vec<DateWindow> {
    let window_days = i64::from(window_days.max(1));
    let mut windows = Vec::new();
    let mut current_start = overall_start;

    while current_start < overall_end {
        let current_end = (current_start + Duration::days(window_days)).min(overall_end);
        windows.push(DateWindow {
            start: current_start,
            end: current_end,
        });
        current_start = current_end + Duration::days(1);
    }

    windows
}
