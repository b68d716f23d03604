//! Name-field probe: which tags actually carry a food's name?
//!
//! Queries a small slice of the catalog for a handful of candidate name
//! tags and reports what each one holds.

use crate::config::Config;
use crate::miner::fetcher::{post_query, FetchResult};
use crate::miner::worker::{Failure, FailureReason};
use crate::miner::{build_http_client, resolve_all};
use crate::protocol::{build_probe_query, parse_probe_response};
use crate::record::FieldMapping;
use crate::robots::check_access;
use crate::GastroError;
use reqwest::Client;

/// Tags tried as the food's name
pub const NAME_CANDIDATES: &[&str] = &[
    "f_ori_name",
    "sci_name",
    "eur_name",
    "f_eng_name",
    "english_name",
    "f_name_en",
    "f_description_en",
];

/// Default catalog offset; the earliest records tend to be incomplete
pub const DEFAULT_PROBE_START: usize = 100;

pub const DEFAULT_PROBE_LIMIT: usize = 10;

/// Values found for each probed identifier
#[derive(Debug, Clone, Default)]
pub struct ProbeReport {
    /// The tags that were queried, in column order
    pub fields: Vec<String>,

    /// One entry per identifier that answered, in catalog order
    pub rows: Vec<(String, FieldMapping)>,

    /// Identifiers whose request failed
    pub skipped: Vec<Failure>,
}

/// Probes the name candidates on `catalog[start..start + limit]`
///
/// Identifiers are queried one at a time, each after the throttle delay.
/// A slice past the end of the catalog is simply shorter (or empty).
pub async fn probe_names(
    config: &Config,
    start: usize,
    limit: usize,
) -> Result<ProbeReport, GastroError> {
    let client = build_http_client(config)?;
    let endpoint = config.endpoint.url.as_str();

    let policy = check_access(
        &client,
        &config.user_agent(),
        endpoint,
        &config.endpoint.robots_url,
    )
    .await;
    if !policy.verdict.permits() {
        return Err(GastroError::AccessDenied {
            policy_url: config.endpoint.robots_url.clone(),
            target_url: endpoint.to_string(),
        });
    }

    let ids = resolve_all(&client, endpoint).await?;
    let slice: Vec<String> = ids.into_iter().skip(start).take(limit).collect();
    tracing::info!(
        "Probing {} name tags on {} identifiers from index {}",
        NAME_CANDIDATES.len(),
        slice.len(),
        start
    );

    let mut report = ProbeReport {
        fields: NAME_CANDIDATES.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    };

    for (i, id) in slice.iter().enumerate() {
        tracing::info!("Querying {} ({}/{})", id, i + 1, slice.len());
        tokio::time::sleep(config.throttle()).await;

        match probe_one(&client, endpoint, id, &config.output.placeholder).await {
            Ok(mapping) => report.rows.push((id.clone(), mapping)),
            Err(failure) => {
                tracing::warn!("Skipping {}", failure);
                report.skipped.push(failure);
            }
        }
    }

    Ok(report)
}

async fn probe_one(
    client: &Client,
    endpoint: &str,
    id: &str,
    placeholder: &str,
) -> Result<FieldMapping, Failure> {
    let payload = build_probe_query(id, NAME_CANDIDATES);
    match post_query(client, endpoint, payload).await {
        FetchResult::Success { body } => parse_probe_response(&body, NAME_CANDIDATES, placeholder)
            .map_err(|e| Failure::new(id, FailureReason::Malformed(e.to_string()))),
        FetchResult::HttpError { status_code } => {
            Err(Failure::new(id, FailureReason::HttpStatus(status_code)))
        }
        FetchResult::NetworkError { error } => {
            Err(Failure::new(id, FailureReason::Unexpected(error)))
        }
    }
}
