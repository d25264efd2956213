//! Data output sinks.

use crate::FeedPost;
use serde::Serialize;

pub mod csv;

/// Output sink errors.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// IO error
    #[error("IO error: {0}")]
    Io(String),

    /// CSV write error
    #[error("CSV error: {0}")]
    Csv(String),

    /// Buffer flush error
    #[error("flush error: {0}")]
    Flush(String),
}

/// Result type for output operations.
pub type OutputResult<T> = Result<T, OutputError>;

/// Fixed projection of a feed post into one output row.
///
/// `post_seq` is assigned by the batch recorder and increases by one per
/// record across the whole run for a given output target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostRow {
    /// Provider post identifier
    pub post_id: String,
    /// Run-wide sequence number, 1-based
    pub post_seq: u64,
    /// Posting account display name
    pub author: String,
    /// Post body text
    pub text: String,
    /// Creation timestamp as reported by the provider
    pub created_at: String,
    /// Repost count
    pub reposts: u64,
    /// Like count
    pub likes: u64,
    /// Reply count
    pub replies: u64,
    /// Quote count
    pub quotes: u64,
}

impl PostRow {
    /// Project a post into a row under sequence number `seq`.
    pub fn project(post: &FeedPost, seq: u64) -> Self {
        Self {
            post_id: post.id.clone(),
            post_seq: seq,
            author: post.author.clone(),
            text: post.text.clone(),
            created_at: post.created_at.clone(),
            reposts: post.repost_count,
            likes: post.like_count,
            replies: post.reply_count,
            quotes: post.quote_count,
        }
    }
}

/// Durable append-only sink for projected rows.
///
/// Implementations must preserve arrival order and never deduplicate.
pub trait RecordSink: Send {
    /// Append one row to the sink.
    fn append_row(&mut self, row: &PostRow) -> OutputResult<()>;

    /// Flush buffered rows to durable storage.
    fn flush(&mut self) -> OutputResult<()>;
}
