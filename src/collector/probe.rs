//! Activity probe.
//!
//! Cheap single-post existence check before committing to full pagination of
//! a window. Best effort only: errors are swallowed and logged, never
//! propagated, and a `false` answer can be a false negative. The scheduler
//! uses the result for logging and, when explicitly enabled, early skipping.

use tracing::warn;

use super::window::DateWindow;
use crate::client::{FeedClient, QuerySpec};

/// Whether `subject` has at least one post inside `window`.
///
/// Costs one remote request. Returns `false` on empty result or on any
/// fetch error.
pub async fn probe<C: FeedClient + ?Sized>(
    client: &C,
    subject: &str,
    window: &DateWindow,
) -> bool {
    let query = QuerySpec::new(subject, window.start, window.end);
    match client.search_latest(&query, 1).await {
        Ok(page) => !page.is_empty(),
        Err(err) => {
            warn!(window = %window, error = %err, "activity probe failed");
            false
        }
    }
}
