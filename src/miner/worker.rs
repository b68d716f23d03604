//! Extraction worker: one identifier in, one row or one failure out

use crate::config::Config;
use crate::miner::fetcher::{post_query, FetchResult};
use crate::protocol::{build_detail_query, parse_detail_response};
use crate::record::{Header, Row};
use reqwest::Client;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Why a single identifier produced no row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The detail request answered with a status other than 200
    HttpStatus(u16),

    /// The detail response could not be decoded
    Malformed(String),

    /// Anything else: connection errors, timeouts, a panicked task
    Unexpected(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HttpStatus(code) => write!(f, "HTTP {}", code),
            Self::Malformed(detail) => write!(f, "malformed response: {}", detail),
            Self::Unexpected(detail) => write!(f, "unexpected error: {}", detail),
        }
    }
}

/// A per-item failure; recorded and counted, never fatal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("identifier {id}: {reason}")]
pub struct Failure {
    pub id: String,
    pub reason: FailureReason,
}

impl Failure {
    pub fn new(id: impl Into<String>, reason: FailureReason) -> Self {
        Self {
            id: id.into(),
            reason,
        }
    }
}

/// What one extraction task produces
pub type Outcome = Result<Row, Failure>;

/// Everything a worker needs, shared read-only by all tasks of a run
#[derive(Debug, Clone)]
pub struct WorkerContext {
    pub client: Client,
    pub endpoint: String,
    pub header: Header,
    pub primary_fields: Vec<String>,
    pub placeholder: String,
    pub throttle: Duration,
}

impl WorkerContext {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            endpoint: config.endpoint.url.clone(),
            header: config.header(),
            primary_fields: config.schema.primary_fields.clone(),
            placeholder: config.output.placeholder.clone(),
            throttle: config.throttle(),
        }
    }
}

/// Extracts the record for one identifier
///
/// Sleeps for the throttle delay, issues the detail query, decodes the
/// response, and projects it onto the header. Touches nothing but the
/// network.
///
/// # Arguments
///
/// * `ctx` - Client, endpoint, and schema shared by the run
/// * `id` - The food identifier to query
///
/// # Returns
///
/// * `Ok(Row)` - A row with exactly one value per header column
/// * `Err(Failure)` - The identifier and why it produced no row
pub async fn extract_one(ctx: &WorkerContext, id: &str) -> Outcome {
    tokio::time::sleep(ctx.throttle).await;

    tracing::debug!("Requesting details for {}", id);
    let body = match post_query(&ctx.client, &ctx.endpoint, build_detail_query(id)).await {
        FetchResult::Success { body } => body,
        FetchResult::HttpError { status_code } => {
            return Err(Failure::new(id, FailureReason::HttpStatus(status_code)));
        }
        FetchResult::NetworkError { error } => {
            return Err(Failure::new(id, FailureReason::Unexpected(error)));
        }
    };

    let mapping = parse_detail_response(&body, ctx.primary_fields.as_slice(), &ctx.placeholder)
        .map_err(|e| Failure::new(id, FailureReason::Malformed(e.to_string())))?;

    Ok(ctx.header.project(&mapping, &ctx.placeholder))
}
