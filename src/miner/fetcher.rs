//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made against the query endpoint:
//! - Building the shared client with the agent string and XML content type
//! - POSTing query payloads
//! - Decoding response bodies in their declared encoding
//! - Classifying the outcome without ever returning an error

use crate::config::Config;
use encoding_rs::{Encoding, UTF_8};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Result of a query POST
#[derive(Debug)]
pub enum FetchResult {
    /// HTTP 200 with a readable body
    Success {
        /// Response body, decoded to UTF-8
        body: String,
    },

    /// Any status other than 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Connection, timeout, or body read failure
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds the HTTP client shared by every request of a run
///
/// The client keeps connections alive between requests and is cheap to
/// clone; all clones share one pool.
///
/// # Example
///
/// ```no_run
/// use gastrominer::config::Config;
/// use gastrominer::miner::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/xml"));

    Client::builder()
        .user_agent(config.user_agent())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.engine.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// POSTs an XML payload to `url`
///
/// A single attempt; timeouts are bounded by the client configuration.
pub async fn post_query(client: &Client, url: &str, payload: String) -> FetchResult {
    let response = match client.post(url).body(payload).send().await {
        Ok(response) => response,
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                format!("Connection failed: {}", e)
            } else {
                e.to_string()
            };
            return FetchResult::NetworkError { error };
        }
    };

    let status = response.status();
    if status != StatusCode::OK {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    match response.bytes().await {
        Ok(bytes) => FetchResult::Success {
            body: decode_body(&bytes, content_type.as_deref()),
        },
        Err(e) => FetchResult::NetworkError {
            error: e.to_string(),
        },
    }
}

/// Decodes a response body to text
///
/// The encoding is taken from, in order:
/// 1. The `charset` parameter of the Content-Type header
/// 2. The `encoding` of the `<?xml ...?>` declaration
/// 3. UTF-8
///
/// A byte order mark overrides all three. Bytes invalid in the chosen
/// encoding are replaced with U+FFFD and a warning is logged.
///
/// # Arguments
///
/// * `bytes` - Raw response body
/// * `content_type` - Content-Type header value, if the response had one
pub fn decode_body(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_encoding)
        .or_else(|| declared_encoding(bytes))
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::warn!(
            "Response body is not valid {}; invalid bytes were replaced",
            used.name()
        );
    }
    text.into_owned()
}

fn charset_encoding(content_type: &str) -> Option<&'static Encoding> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        Encoding::for_label(value.trim().trim_matches('"').as_bytes())
    })
}

/// Encoding named by the XML declaration at the start of `bytes`
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    // The declaration itself is ASCII in every encoding we can name here
    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(256)]);
    let decl = head.trim_start_matches('\u{feff}').trim_start().strip_prefix("<?xml")?;
    let decl = &decl[..decl.find("?>")?];

    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let rest = &rest[1..];
    let label = &rest[..rest.find(quote)?];

    Encoding::for_label(label.as_bytes())
}
