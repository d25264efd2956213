//! # Feed Harvester Library
//!
//! Bulk, time-windowed collection of a paginated, rate-limited social feed.
//! Partitions a date range into fixed-size windows, paginates each window to
//! completion with rate-limit aware backoff, and appends every page to a
//! per-window CSV file as soon as it arrives.
//!
//! ## Features
//!
//! - **Windowed collection**: fixed-size date windows (default 180 days), one
//!   output file per window
//! - **Rate-limit handling**: provider reset timestamps are honored with a
//!   safety margin; rate limits never count against retry budgets
//! - **Bounded retries**: transient failures back off exponentially with
//!   jitter and abandon a window after the retry budget is exhausted,
//!   keeping partial results
//! - **Incremental persistence**: each page is written and flushed before the
//!   next fetch, so an interrupted run loses at most the in-flight request
//! - **Graceful shutdown**: every pacing and backoff wait is interruptible by
//!   Ctrl+C
//!
//! ## Quick Start
//!
//! ```no_run
//! use feed_harvester::client::http::SearchHttpClient;
//! use feed_harvester::client::session::Session;
//! use feed_harvester::collector::config::CollectorConfig;
//! use feed_harvester::runner::Harvester;
//! use feed_harvester::shutdown::ShutdownCoordinator;
//! use chrono::NaiveDate;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::load("cookies.json")?;
//! let client = SearchHttpClient::new("https://feed.example.com/api", &session)?;
//!
//! let harvester = Harvester::new(
//!     client,
//!     CollectorConfig::default(),
//!     "./data".into(),
//!     ShutdownCoordinator::shared(),
//! );
//!
//! let summary = harvester
//!     .execute(
//!         "acct1",
//!         NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2022, 7, 1).unwrap(),
//!     )
//!     .await?;
//! println!("collected {} posts", summary.total_records);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`client`] - Remote feed client boundary: error taxonomy, query
//!   construction, session loading, HTTP implementation
//! - [`collector`] - Collection control: backoff policy, window partitioning,
//!   pagination driver, batch recorder, window scheduler
//! - [`output`] - Append-only CSV sinks with idempotent creation
//! - [`runner`] - Top-level run lifecycle and terminal reporting
//! - [`shutdown`] - Shutdown coordination and interruptible waits

#![warn(missing_docs)]
#![warn(clippy::all)]

use serde::{Deserialize, Serialize};

/// Command-line argument surface
pub mod cli;

/// Remote feed client boundary
pub mod client;

/// Collection control subsystem
pub mod collector;

/// Data output sinks
pub mod output;

/// Run lifecycle controller
pub mod runner;

/// Graceful shutdown coordination shared across modules
pub mod shutdown;

/// A single post returned by the remote feed.
///
/// Engagement counters are optional on the wire; absent counters default
/// to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedPost {
    /// Provider-assigned post identifier
    pub id: String,
    /// Display name of the posting account
    pub author: String,
    /// Post body text
    pub text: String,
    /// Creation timestamp as reported by the provider
    pub created_at: String,
    /// Repost count
    #[serde(default)]
    pub repost_count: u64,
    /// Like count
    #[serde(default)]
    pub like_count: u64,
    /// Reply count
    #[serde(default)]
    pub reply_count: u64,
    /// Quote count
    #[serde(default)]
    pub quote_count: u64,
}

/// Opaque continuation token for fetching the next page of a query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor(String);

impl Cursor {
    /// Wrap a provider-supplied continuation token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value for request construction.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One page of posts plus the continuation token for the following page.
///
/// Owned transiently by the pagination driver; handed to the batch recorder
/// and dropped before the next fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPage {
    /// Posts in arrival order
    pub posts: Vec<FeedPost>,
    /// Continuation token, or `None` when the provider reports no more pages
    pub next_cursor: Option<Cursor>,
}

impl RecordPage {
    /// Page with no posts and no continuation, the provider's "no result" shape.
    pub fn empty() -> Self {
        Self {
            posts: Vec::new(),
            next_cursor: None,
        }
    }

    /// Number of posts in this page.
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// Whether the page carries no posts.
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
