//! Robots.txt parser implementation
//!
//! This module provides functionality for evaluating robots.txt content using the robotstxt crate.

use robotstxt::DefaultMatcher;

/// A successfully fetched robots.txt document
#[derive(Debug, Clone)]
pub struct ParsedRobots {
    content: String,
}

impl ParsedRobots {
    /// Wraps raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Checks if `url` may be fetched by `user_agent`
    ///
    /// `user_agent` may be a full agent string such as
    /// `GastroMiner-Bot/2.2 (Educational Research)`; only its product token
    /// is matched against `User-agent` groups. An empty document allows
    /// everything.
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, product_token(user_agent), url)
    }

    /// Gets the crawl delay that applies to the given user agent
    ///
    /// A group naming the agent wins over the wildcard group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let token = product_token(user_agent).to_lowercase();

        let mut current_user_agents: Vec<String> = Vec::new();
        let mut in_rules = false;
        let mut crawl_delay_for_wildcard: Option<f64> = None;
        let mut crawl_delay_for_agent: Option<f64> = None;

        for line in self.content.lines() {
            let trimmed = line.split('#').next().unwrap_or("").trim();
            if trimmed.is_empty() {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    // A user-agent line after rules starts a new group
                    if in_rules {
                        current_user_agents.clear();
                        in_rules = false;
                    }
                    current_user_agents.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    in_rules = true;
                    let Ok(delay) = value.parse::<f64>() else {
                        continue;
                    };
                    if current_user_agents.iter().any(|ua| *ua == token) {
                        crawl_delay_for_agent = Some(delay);
                    } else if current_user_agents.iter().any(|ua| ua == "*") {
                        crawl_delay_for_wildcard = Some(delay);
                    }
                }
                _ => in_rules = true,
            }
        }

        crawl_delay_for_agent.or(crawl_delay_for_wildcard)
    }
}

/// The product token of an agent string: everything before the first `/`
pub fn product_token(user_agent: &str) -> &str {
    user_agent
        .split(|c: char| c == '/' || c.is_whitespace())
        .next()
        .unwrap_or(user_agent)
}
