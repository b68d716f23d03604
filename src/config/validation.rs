use crate::config::types::{AgentConfig, Config, EndpointConfig, EngineConfig, OutputConfig, SchemaConfig};
use crate::ConfigError;
use std::collections::HashSet;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_endpoint_config(&config.endpoint)?;
    validate_agent_config(&config.agent)?;
    validate_engine_config(&config.engine)?;
    validate_output_config(&config.output)?;
    validate_schema_config(&config.schema)?;
    Ok(())
}

fn validate_endpoint_config(config: &EndpointConfig) -> Result<(), ConfigError> {
    validate_http_url("endpoint url", &config.url)?;
    validate_http_url("robots-url", &config.robots_url)?;
    Ok(())
}

fn validate_http_url(label: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", label, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            label, value
        )));
    }

    Ok(())
}

fn validate_agent_config(config: &AgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "agent name cannot be empty".to_string(),
        ));
    }

    // The name doubles as the robots.txt product token
    if !config.name.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return Err(ConfigError::Validation(format!(
            "agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    if config.version.is_empty() {
        return Err(ConfigError::Validation(
            "agent version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_engine_config(config: &EngineConfig) -> Result<(), ConfigError> {
    if config.workers < 1 || config.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            config.workers
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.throttle_ms == 0 {
        tracing::warn!("throttle-ms is 0: requests will not be throttled");
    }

    Ok(())
}

fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.csv_path.is_empty() {
        return Err(ConfigError::Validation(
            "csv-path cannot be empty".to_string(),
        ));
    }

    if config.placeholder.is_empty() {
        return Err(ConfigError::Validation(
            "placeholder cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_schema_config(config: &SchemaConfig) -> Result<(), ConfigError> {
    if config.primary_fields.is_empty() {
        return Err(ConfigError::Validation(
            "primary-fields must name at least one column".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for column in config.primary_fields.iter().chain(&config.detail_fields) {
        if column.is_empty() {
            return Err(ConfigError::Validation(
                "column names cannot be empty".to_string(),
            ));
        }
        if !seen.insert(column.as_str()) {
            return Err(ConfigError::Validation(format!(
                "column '{}' appears more than once in the header",
                column
            )));
        }
    }

    Ok(())
}
