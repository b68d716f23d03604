//! Catalog resolution: the one request that lists every identifier

use crate::miner::fetcher::{post_query, FetchResult};
use crate::protocol::{build_catalog_query, parse_catalog_response};
use crate::CatalogError;
use reqwest::Client;

/// Fetches the full identifier catalog from `endpoint`
///
/// There is no retry. A transport failure, a non-200 status, an unparsable
/// body, or a catalog with no identifiers are all errors; without a catalog
/// there is nothing to extract.
///
/// # Arguments
///
/// * `client` - The run's shared HTTP client
/// * `endpoint` - URL of the XML query service
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Every identifier, in catalog order
/// * `Err(CatalogError)` - The catalog could not be obtained
pub async fn resolve_all(client: &Client, endpoint: &str) -> Result<Vec<String>, CatalogError> {
    tracing::info!("Requesting identifier catalog from {}", endpoint);

    let body = match post_query(client, endpoint, build_catalog_query().to_string()).await {
        FetchResult::Success { body } => body,
        FetchResult::HttpError { status_code } => return Err(CatalogError::Status(status_code)),
        FetchResult::NetworkError { error } => return Err(CatalogError::Request(error)),
    };

    let ids = parse_catalog_response(&body)?;
    if ids.is_empty() {
        return Err(CatalogError::Empty);
    }

    tracing::info!("Catalog indexed: {} identifiers found", ids.len());
    Ok(ids)
}
