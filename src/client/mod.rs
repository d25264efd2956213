//! Remote feed client boundary.
//!
//! The collector only ever talks to the feed through [`FeedClient`], so the
//! pagination driver can be exercised against a scripted in-memory client in
//! tests while production uses the HTTP implementation in [`http`].

use crate::{Cursor, RecordPage};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

pub mod http;
pub mod session;

/// Feed client errors.
///
/// The pagination driver dispatches on the variant: [`ClientError::RateLimited`]
/// is always retried after waiting out the provider's reset time and never
/// counts toward retry exhaustion; every other variant is treated as a
/// transient failure and counted.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Provider rejected the request because the rate-limit budget is spent
    #[error("rate limited until {reset_at}")]
    RateLimited {
        /// Timestamp after which new requests are accepted again
        reset_at: DateTime<Utc>,
    },

    /// Network-level failure or server error, worth retrying
    #[error("transient error: {0}")]
    Transient(String),

    /// Response body could not be decoded
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider rejected the request outright (4xx other than 429)
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Search query for one account over one date window.
///
/// A pure function of its inputs; the rendered form follows the feed's
/// search syntax (`from:<subject> since:<date> until:<date>`, date bounds
/// inclusive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    subject: String,
    since: NaiveDate,
    until: NaiveDate,
}

impl QuerySpec {
    /// Build the query for `subject` between `since` and `until` (inclusive).
    pub fn new(subject: &str, since: NaiveDate, until: NaiveDate) -> Self {
        Self {
            subject: subject.to_string(),
            since,
            until,
        }
    }

    /// Render the provider search string.
    pub fn to_query(&self) -> String {
        format!(
            "from:{} since:{} until:{}",
            self.subject, self.since, self.until
        )
    }
}

impl std::fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_query())
    }
}

/// Remote feed client operations required by the collector.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Issue the initial search for a query, newest posts first.
    ///
    /// An empty [`RecordPage`] is the provider's "no result" answer.
    async fn search_latest(&self, query: &QuerySpec, page_size: u32) -> ClientResult<RecordPage>;

    /// Fetch the page following `cursor`.
    async fn fetch_next(&self, cursor: &Cursor) -> ClientResult<RecordPage>;
}
