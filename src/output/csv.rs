//! CSV sink implementation.
//!
//! One append-only CSV file per date window, named deterministically from the
//! window bounds. Creation is idempotent: opening an existing non-empty file
//! appends rows without duplicating the header.

use chrono::NaiveDate;
use csv::{Writer, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::Path;
use tracing::{debug, info};

use super::{OutputError, OutputResult, PostRow, RecordSink};

const HEADERS: [&str; 9] = [
    "post_id",
    "post_seq",
    "author",
    "text",
    "created_at",
    "reposts",
    "likes",
    "replies",
    "quotes",
];

const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Output file name for the window spanning `start` to `end` (inclusive).
pub fn window_file_name(start: NaiveDate, end: NaiveDate) -> String {
    format!("posts_{start}_{end}.csv")
}

/// Append-only CSV sink for one window's posts.
pub struct CsvWindowSink {
    writer: Writer<BufWriter<File>>,
    rows_written: u64,
}

impl CsvWindowSink {
    /// Open or create the sink at `path`.
    ///
    /// A new or empty file gets the header row; an existing file is opened in
    /// append mode untouched, so re-running a window never duplicates the
    /// header or clobbers prior rows.
    pub fn create<P: AsRef<Path>>(path: P) -> OutputResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| OutputError::Io(format!("failed to create directory: {e}")))?;
        }

        let needs_header = match std::fs::metadata(path) {
            Ok(meta) => meta.len() == 0,
            Err(_) => true,
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| OutputError::Io(format!("failed to open {}: {e}", path.display())))?;

        let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(buf_writer);

        if needs_header {
            info!(path = %path.display(), "creating window output");
            writer
                .write_record(HEADERS)
                .map_err(|e| OutputError::Csv(format!("failed to write header: {e}")))?;
            writer
                .flush()
                .map_err(|e| OutputError::Flush(e.to_string()))?;
        } else {
            debug!(path = %path.display(), "appending to existing window output");
        }

        Ok(Self {
            writer,
            rows_written: 0,
        })
    }

    /// Rows appended through this handle (excludes pre-existing rows).
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }
}

impl RecordSink for CsvWindowSink {
    fn append_row(&mut self, row: &PostRow) -> OutputResult<()> {
        self.writer
            .serialize(row)
            .map_err(|e| OutputError::Csv(format!("failed to write row: {e}")))?;
        self.rows_written += 1;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.writer
            .flush()
            .map_err(|e| OutputError::Flush(e.to_string()))
    }
}
