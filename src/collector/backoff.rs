//! Backoff policy.
//!
//! Pure wait-duration computation; callers own the actual suspension. Four
//! cases: rate-limit recovery pinned to the provider's reset time, jittered
//! exponential recovery for transient failures, and random pacing between
//! pages and between windows to avoid a mechanical request rhythm.

use chrono::{DateTime, Utc};
use rand::Rng;
use std::time::Duration;

use super::config::{
    MIN_RATE_LIMIT_WAIT, PAGE_PACING_SECS, RATE_LIMIT_SAFETY_MARGIN, TRANSIENT_JITTER_SECS,
    WINDOW_PACING_SECS,
};

/// Wait until the provider's reset time plus a safety margin.
///
/// Never negative: a reset time already in the past clamps to
/// [`MIN_RATE_LIMIT_WAIT`] rather than producing a zero or negative sleep.
pub fn rate_limit_wait(reset_at: DateTime<Utc>, now: DateTime<Utc>) -> Duration {
    let until_reset = reset_at.signed_duration_since(now).num_milliseconds();
    let wait_ms = until_reset + RATE_LIMIT_SAFETY_MARGIN.as_millis() as i64;

    if wait_ms <= MIN_RATE_LIMIT_WAIT.as_millis() as i64 {
        MIN_RATE_LIMIT_WAIT
    } else {
        Duration::from_millis(wait_ms as u64)
    }
}

/// Exponential wait with jitter for the `attempt`-th consecutive transient
/// failure, attempt starting at 1 for the first retry.
pub fn transient_wait(attempt: u32) -> Duration {
    let base = 2u64.saturating_pow(attempt);
    let jitter = rand::thread_rng().gen_range(TRANSIENT_JITTER_SECS);
    Duration::from_secs(base.saturating_add(jitter))
}

/// Pacing before fetching any page after the first.
pub fn page_wait() -> Duration {
    Duration::from_secs(rand::thread_rng().gen_range(PAGE_PACING_SECS))
}

/// Pacing after a window completes, before starting the next.
pub fn window_wait() -> Duration {
    Duration::from_secs(rand::thread_rng().gen_range(WINDOW_PACING_SECS))
}
