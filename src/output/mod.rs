//! Console output: progress lines, run summaries, and reports
//!
//! Nothing here touches the CSV file; rows are written by the storage layer.

mod report;
pub mod stats;

pub use report::{
    format_elapsed, format_probe_table, print_dry_run, print_probe_report, PROBE_CELL_WIDTH,
};
pub use stats::{print_summary, progress_line, RunSummary, PROGRESS_INTERVAL};
