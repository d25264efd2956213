//! Pagination driver.
//!
//! Drives one date window to completion as an explicit state machine:
//!
//! - `FirstFetch`: issue the initial window query
//! - `NextFetch`: pace, then follow the continuation cursor
//! - `Done`: the provider reported no more posts
//! - `Abandoned`: the transient retry budget is exhausted
//!
//! Rate limits are waited out using the provider's reset time and never
//! count toward the retry budget; any other fetch error is transient and
//! counted. Each successful page is recorded and flushed before the next
//! fetch, so no window is ever buffered whole in memory. Fetch errors never
//! escape this function; only sink failures do.

use chrono::Utc;
use tracing::{error, info, warn};

use super::backoff;
use super::config::CollectorConfig;
use super::recorder::BatchRecorder;
use super::window::DateWindow;
use super::CollectorError;
use crate::client::{ClientError, FeedClient, QuerySpec};
use crate::output::RecordSink;
use crate::shutdown::ShutdownCoordinator;
use crate::Cursor;

/// States of one window's pagination loop.
#[derive(Debug)]
enum DriveState {
    FirstFetch,
    NextFetch(Cursor),
    Done,
    Abandoned,
}

/// Paginate `window` to completion, recording every page through `recorder`.
///
/// `run_base` is the run total before this window; sequence numbers continue
/// from it. Returns the number of posts written for this window, including
/// the partial count when the window is abandoned or a shutdown request
/// stops it early.
pub async fn collect<C, S>(
    client: &C,
    subject: &str,
    window: &DateWindow,
    recorder: &mut BatchRecorder<S>,
    run_base: u64,
    config: &CollectorConfig,
    shutdown: &ShutdownCoordinator,
) -> Result<u64, CollectorError>
where
    C: FeedClient + ?Sized,
    S: RecordSink,
{
    let query = QuerySpec::new(subject, window.start, window.end);
    info!(window = %window, "collecting window");

    let mut state = DriveState::FirstFetch;
    let mut written: u64 = 0;
    let mut transient_failures: u32 = 0;

    loop {
        let result = match &state {
            DriveState::FirstFetch => client.search_latest(&query, config.page_size).await,
            DriveState::NextFetch(cursor) => {
                if shutdown.sleep_interruptible(backoff::page_wait()).await {
                    info!(window = %window, "shutdown requested, stopping window early");
                    break;
                }
                client.fetch_next(cursor).await
            }
            DriveState::Done | DriveState::Abandoned => break,
        };

        match result {
            Ok(page) if page.is_empty() => {
                state = DriveState::Done;
            }
            Ok(page) => {
                written += recorder.record(&page, run_base + written)?;
                transient_failures = 0;
                state = match page.next_cursor {
                    Some(cursor) => DriveState::NextFetch(cursor),
                    None => DriveState::Done,
                };
            }
            Err(ClientError::RateLimited { reset_at }) => {
                // Retry the same fetch after the reset; never counted
                let wait = backoff::rate_limit_wait(reset_at, Utc::now());
                warn!(
                    window = %window,
                    reset_at = %reset_at,
                    wait_secs = wait.as_secs(),
                    "rate limit reached, waiting"
                );
                if shutdown.sleep_interruptible(wait).await {
                    break;
                }
            }
            Err(err) => {
                transient_failures += 1;
                if transient_failures > config.max_retries {
                    error!(
                        window = %window,
                        error = %err,
                        retries = config.max_retries,
                        "retries exhausted, abandoning window"
                    );
                    state = DriveState::Abandoned;
                } else {
                    let wait = backoff::transient_wait(transient_failures);
                    warn!(
                        window = %window,
                        error = %err,
                        attempt = transient_failures,
                        wait_secs = wait.as_secs(),
                        "transient error, retrying"
                    );
                    if shutdown.sleep_interruptible(wait).await {
                        break;
                    }
                }
            }
        }
    }

    Ok(written)
}
