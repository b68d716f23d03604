//! Storage module for persisting extracted rows
//!
//! Output is a flat CSV file: the header first, then one record per
//! successfully extracted food, in completion order.

mod csv_sink;
mod traits;

pub use csv_sink::CsvSink;
pub use traits::{RecordSink, StorageError, StorageResult};

use crate::record::Header;
use std::path::Path;

/// Creates the output file at `path` and writes the header
pub fn open_sink(path: &Path, header: &Header) -> StorageResult<CsvSink> {
    CsvSink::create(path, header)
}
