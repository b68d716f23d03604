//! CSV file record sink

use crate::record::{Header, Row};
use crate::storage::traits::{RecordSink, StorageError, StorageResult};
use csv::{Terminator, Writer, WriterBuilder};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

struct SinkState {
    writer: Writer<File>,
    rows_written: u64,
}

/// Appends rows to a UTF-8 CSV file behind a mutex
///
/// The lock is held only for the write and flush of a single row.
pub struct CsvSink {
    path: PathBuf,
    width: usize,
    state: Mutex<SinkState>,
}

impl CsvSink {
    /// Creates (or truncates) `path` and writes `header` as its first record
    ///
    /// # Arguments
    ///
    /// * `path` - Output file; its parent directory must exist
    /// * `header` - Column names, written once and flushed
    ///
    /// # Returns
    ///
    /// * `Ok(CsvSink)` - Sink ready for `append`
    /// * `Err(StorageError)` - The file could not be created or written
    pub fn create(path: &Path, header: &Header) -> StorageResult<Self> {
        let file = File::create(path).map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let mut writer = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(file);

        writer
            .write_record(header.columns())
            .map_err(|source| StorageError::Csv {
                path: path.display().to_string(),
                source,
            })?;
        writer.flush().map_err(|source| StorageError::Io {
            path: path.display().to_string(),
            source,
        })?;

        tracing::info!(
            "Output file {} initialized with {} columns",
            path.display(),
            header.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            width: header.len(),
            state: Mutex::new(SinkState {
                writer,
                rows_written: 0,
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for CsvSink {
    fn append(&self, row: &Row) -> StorageResult<()> {
        if row.len() != self.width {
            return Err(StorageError::RowWidth {
                expected: self.width,
                got: row.len(),
            });
        }

        let mut state = self.state.lock().map_err(|_| StorageError::Poisoned)?;

        state
            .writer
            .write_record(row.values())
            .map_err(|source| StorageError::Csv {
                path: self.path.display().to_string(),
                source,
            })?;
        state.writer.flush().map_err(|source| StorageError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        state.rows_written += 1;

        Ok(())
    }

    fn rows_written(&self) -> u64 {
        self.state
            .lock()
            .map(|state| state.rows_written)
            .unwrap_or_default()
    }
}
