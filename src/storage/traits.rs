//! Storage traits and error types
//!
//! This module defines the trait interface for record sinks and the
//! associated error types.

use crate::record::Row;
use thiserror::Error;

/// Errors that can occur during storage operations
///
/// Every one of these is fatal to a run: rows are never silently dropped.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("Row has {got} fields but the header has {expected}")]
    RowWidth { expected: usize, got: usize },

    #[error("Sink lock poisoned by a panicking writer")]
    Poisoned,
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// An append-only destination for rows
///
/// Implementations must accept concurrent `append` calls from any number of
/// callers, writing each row whole: two rows never interleave.
pub trait RecordSink: Send + Sync {
    /// Appends exactly one row and makes it durable before returning
    fn append(&self, row: &Row) -> StorageResult<()>;

    /// Number of data rows appended so far (the header is not counted)
    fn rows_written(&self) -> u64;
}
