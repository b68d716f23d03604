//! Extraction engine
//!
//! This module contains the extraction pipeline, including:
//! - HTTP transport against the XML query endpoint
//! - Catalog resolution
//! - Per-identifier extraction workers
//! - Run coordination with a bounded worker pool
//! - The name-field probe

mod catalog;
mod coordinator;
mod fetcher;
mod probe;
mod worker;

pub use catalog::resolve_all;
pub use coordinator::{run_extraction, Coordinator};
pub use fetcher::{build_http_client, decode_body, post_query, FetchResult};
pub use probe::{
    probe_names, ProbeReport, DEFAULT_PROBE_LIMIT, DEFAULT_PROBE_START, NAME_CANDIDATES,
};
pub use worker::{extract_one, Failure, FailureReason, Outcome, WorkerContext};
