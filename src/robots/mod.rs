//! Robots.txt access policy gate
//!
//! The policy is fetched once before a run. A policy that was fetched and
//! says no stops the run; a policy that could not be fetched at all does not.

mod parser;

pub use parser::{product_token, ParsedRobots};

use reqwest::{Client, StatusCode};

/// Outcome of checking the access policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessVerdict {
    /// The policy was read and permits the target
    Allowed,

    /// The policy was read and forbids the target
    Denied,

    /// The policy could not be read; treated as allowed
    Indeterminate,
}

impl AccessVerdict {
    /// Whether the run may proceed
    pub fn permits(&self) -> bool {
        !matches!(self, Self::Denied)
    }
}

/// Verdict plus whatever else the policy said about our agent
#[derive(Debug, Clone)]
pub struct PolicyCheck {
    pub verdict: AccessVerdict,

    /// `Crawl-delay` for the agent, in seconds
    pub crawl_delay: Option<f64>,
}

/// Result of fetching the policy document
#[derive(Debug)]
pub enum PolicyFetch {
    /// 2xx with a body
    Document(ParsedRobots),

    /// 401 or 403: the site refuses us the policy itself
    Forbidden(u16),

    /// Any other 4xx: no policy is published
    Missing(u16),

    /// 5xx, network error, or unreadable body
    Unavailable(String),
}

/// Fetches robots.txt from `policy_url`
///
/// Never fails; every outcome is classified into a [`PolicyFetch`].
pub async fn fetch_robots(client: &Client, policy_url: &str) -> PolicyFetch {
    let response = match client.get(policy_url).send().await {
        Ok(response) => response,
        Err(e) => return PolicyFetch::Unavailable(e.to_string()),
    };

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return PolicyFetch::Forbidden(status.as_u16());
    }
    if status.is_client_error() {
        return PolicyFetch::Missing(status.as_u16());
    }
    if !status.is_success() {
        return PolicyFetch::Unavailable(format!("HTTP {}", status.as_u16()));
    }

    match response.text().await {
        Ok(body) => PolicyFetch::Document(ParsedRobots::from_content(&body)),
        Err(e) => PolicyFetch::Unavailable(e.to_string()),
    }
}

/// Turns a fetched policy into a verdict for `user_agent` on `target_url`
pub fn evaluate(fetch: &PolicyFetch, user_agent: &str, target_url: &str) -> PolicyCheck {
    match fetch {
        PolicyFetch::Document(robots) => PolicyCheck {
            verdict: if robots.is_allowed(target_url, user_agent) {
                AccessVerdict::Allowed
            } else {
                AccessVerdict::Denied
            },
            crawl_delay: robots.crawl_delay(user_agent),
        },
        PolicyFetch::Forbidden(_) => PolicyCheck {
            verdict: AccessVerdict::Denied,
            crawl_delay: None,
        },
        PolicyFetch::Missing(_) => PolicyCheck {
            verdict: AccessVerdict::Allowed,
            crawl_delay: None,
        },
        PolicyFetch::Unavailable(_) => PolicyCheck {
            verdict: AccessVerdict::Indeterminate,
            crawl_delay: None,
        },
    }
}

/// Fetches the policy and checks whether `user_agent` may query `target_url`
///
/// # Arguments
///
/// * `client` - HTTP client used for the policy request
/// * `user_agent` - Full agent string; only its product token is matched
/// * `target_url` - The URL the run will query
/// * `policy_url` - Where robots.txt is published
///
/// # Returns
///
/// The verdict and any `Crawl-delay` for the agent. Never fails: a policy
/// that cannot be fetched yields [`AccessVerdict::Indeterminate`].
pub async fn check_access(
    client: &Client,
    user_agent: &str,
    target_url: &str,
    policy_url: &str,
) -> PolicyCheck {
    tracing::debug!("Fetching robots.txt from {}", policy_url);
    let fetch = fetch_robots(client, policy_url).await;

    match &fetch {
        PolicyFetch::Document(_) => tracing::debug!("robots.txt fetched"),
        PolicyFetch::Forbidden(code) => {
            tracing::warn!("robots.txt refused with HTTP {}", code)
        }
        PolicyFetch::Missing(code) => {
            tracing::info!("No robots.txt published (HTTP {}), assuming allowed", code)
        }
        PolicyFetch::Unavailable(reason) => {
            tracing::warn!("Could not read robots.txt ({}), assuming allowed", reason)
        }
    }

    evaluate(&fetch, user_agent, target_url)
}
