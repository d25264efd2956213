//! Batch recorder.
//!
//! Assigns run-wide sequence numbers and appends each page to the window's
//! sink in arrival order. No reordering, no deduplication: if the provider
//! redelivers a page after a mid-stream retry, the duplicates are preserved
//! as delivered.

use tracing::info;

use crate::output::{OutputResult, PostRow, RecordSink};
use crate::RecordPage;

/// Records pages of posts against one output target.
pub struct BatchRecorder<S: RecordSink> {
    sink: S,
}

impl<S: RecordSink> BatchRecorder<S> {
    /// Bind a recorder to a window's sink.
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// Unwrap the underlying sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Append every post in `page`, numbering from `running_base + 1`.
    ///
    /// The page is flushed to durable storage before this returns, so a crash
    /// between pages never loses an acknowledged batch. Returns the number of
    /// rows written, always equal to the page length.
    pub fn record(&mut self, page: &RecordPage, running_base: u64) -> OutputResult<u64> {
        for (i, post) in page.posts.iter().enumerate() {
            let seq = running_base + i as u64 + 1;
            self.sink.append_row(&PostRow::project(post, seq))?;
        }
        self.sink.flush()?;

        let written = page.len() as u64;
        info!(
            batch = written,
            total = running_base + written,
            "processed batch"
        );
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputError;
    use crate::{FeedPost, RecordPage};

    #[derive(Default)]
    struct MemorySink {
        rows: Vec<PostRow>,
        flushes: usize,
        fail_next: bool,
    }

    impl RecordSink for MemorySink {
        fn append_row(&mut self, row: &PostRow) -> OutputResult<()> {
            if self.fail_next {
                return Err(OutputError::Io("disk full".to_string()));
            }
            self.rows.push(row.clone());
            Ok(())
        }

        fn flush(&mut self) -> OutputResult<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    fn post(id: &str) -> FeedPost {
        FeedPost {
            id: id.to_string(),
            author: "acct1".to_string(),
            text: format!("post {id}"),
            created_at: "2022-01-01T00:00:00Z".to_string(),
            repost_count: 0,
            like_count: 0,
            reply_count: 0,
            quote_count: 0,
        }
    }

    fn page(ids: &[&str]) -> RecordPage {
        RecordPage {
            posts: ids.iter().map(|id| post(id)).collect(),
            next_cursor: None,
        }
    }

    #[test]
    fn sequence_numbers_continue_across_pages() {
        let mut recorder = BatchRecorder::new(MemorySink::default());

        let first = recorder.record(&page(&["a", "b"]), 0).unwrap();
        assert_eq!(first, 2);
        let second = recorder.record(&page(&["c"]), first).unwrap();
        assert_eq!(second, 1);

        let seqs: Vec<u64> = recorder.sink.rows.iter().map(|r| r.post_seq).collect();
        assert_eq!(seqs, vec![1, 2, 3]);
    }

    #[test]
    fn each_page_is_flushed() {
        let mut recorder = BatchRecorder::new(MemorySink::default());
        recorder.record(&page(&["a"]), 0).unwrap();
        recorder.record(&page(&["b"]), 1).unwrap();
        assert_eq!(recorder.sink.flushes, 2);
    }

    #[test]
    fn empty_page_writes_nothing() {
        let mut recorder = BatchRecorder::new(MemorySink::default());
        let written = recorder.record(&RecordPage::empty(), 7).unwrap();
        assert_eq!(written, 0);
        assert!(recorder.sink.rows.is_empty());
    }

    #[test]
    fn redelivered_pages_are_not_deduplicated() {
        // Policy decision: the provider may redeliver a page after a
        // mid-stream transient failure; duplicates are preserved as-is.
        let mut recorder = BatchRecorder::new(MemorySink::default());
        recorder.record(&page(&["a", "b"]), 0).unwrap();
        recorder.record(&page(&["a", "b"]), 2).unwrap();

        let ids: Vec<&str> = recorder.sink.rows.iter().map(|r| r.post_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "a", "b"]);
        let seqs: Vec<u64> = recorder.sink.rows.iter().map(|r| r.post_seq).collect();
        assert_eq!(seqs, vec![1, 2, 3, 4]);
    }

    #[test]
    fn sink_failure_propagates() {
        let mut recorder = BatchRecorder::new(MemorySink {
            fail_next: true,
            ..Default::default()
        });
        assert!(recorder.record(&page(&["a"]), 0).is_err());
    }
}
