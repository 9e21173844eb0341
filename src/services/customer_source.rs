use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Split};

use crate::error::{AppError, Error};
use crate::models::CustomerRecord;

/// One line taken from a customer source
#[derive(Debug)]
pub struct SourceLine {
    /// 0-based position of the line in the source
    pub index: usize,
    pub record: Result<CustomerRecord, serde_json::Error>,
}

/// Records read from a source, plus the lines that were skipped
#[derive(Debug, Default)]
pub struct Ingested {
    pub records: Vec<CustomerRecord>,
    /// Indexes of malformed lines that were skipped
    pub skipped_lines: Vec<usize>,
    pub lines_read: usize,
}

/// Line-delimited JSON customer source
///
/// A lazy, finite sequence of lines. It is consumed by [`CustomerSource::ingest`]
/// and cannot be rewound; the underlying reader is released when the
/// source is dropped, whichever way ingestion ends.
pub struct CustomerSource<R> {
    lines: Split<R>,
    next_index: usize,
}

impl CustomerSource<BufReader<File>> {
    /// Open a customer file
    ///
    /// Fails with `SourceNotFound` if the path cannot be opened or is not a
    /// regular file; nothing is read in that case.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let not_found = |reason: &dyn std::fmt::Display| {
            tracing::debug!(path = %path.display(), error = %reason, "Customer source unavailable");
            AppError::SourceNotFound {
                path: path.to_path_buf(),
            }
        };

        let file = File::open(path).await.map_err(|e| not_found(&e))?;
        let metadata = file.metadata().await.map_err(|e| not_found(&e))?;
        if !metadata.is_file() {
            return Err(not_found(&"not a regular file"));
        }

        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin> CustomerSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.split(b'\n'),
            next_index: 0,
        }
    }

    /// Read and parse the next line
    ///
    /// Returns `Ok(None)` once the source is exhausted. Read failures are
    /// returned as-is; parse failures are carried inside the [`SourceLine`].
    pub async fn next_line(&mut self) -> std::io::Result<Option<SourceLine>> {
        let Some(mut bytes) = self.lines.next_segment().await? else {
            return Ok(None);
        };

        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }

        let index = self.next_index;
        self.next_index += 1;

        Ok(Some(SourceLine {
            index,
            record: serde_json::from_slice(&bytes),
        }))
    }

    /// Drain the source into parsed records
    ///
    /// Malformed lines are skipped unless `strict` is set, in which case
    /// ingestion stops at the first one with `StrictIngestion` and the
    /// remaining lines are never read.
    pub async fn ingest(mut self, strict: bool) -> Result<Ingested, Error> {
        let mut ingested = Ingested::default();

        while let Some(line) = self.next_line().await? {
            ingested.lines_read += 1;

            match line.record {
                Ok(record) => ingested.records.push(record),
                Err(err) if strict => {
                    tracing::warn!(
                        line = line.index,
                        parsed = ingested.records.len(),
                        error = %err,
                        "Malformed customer line, aborting"
                    );
                    return Err(AppError::StrictIngestion { line: line.index }.into());
                }
                Err(err) => {
                    tracing::debug!(line = line.index, error = %err, "Skipping malformed customer line");
                    ingested.skipped_lines.push(line.index);
                }
            }
        }

        Ok(ingested)
    }
}
