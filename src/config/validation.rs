use crate::config::types::{BackgroundConfig, BatchConfig, Config, ExtractorConfig, HttpConfig};
use crate::roles::Role;
use crate::ConfigError;
use std::collections::BTreeMap;
use url::Url;

const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 120_000;
const MAX_REDIRECTS: usize = 20;
const MAX_BATCH_CONCURRENCY: usize = 32;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_http_config(&config.http)?;
    validate_extractor_config(&config.extractor)?;
    validate_batch_config(&config.batch)?;
    validate_background_config(&config.background)?;
    validate_role_overrides(&config.roles)?;
    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("policy-timeout-ms", config.policy_timeout_ms),
        ("fetch-timeout-ms", config.fetch_timeout_ms),
        ("connect-timeout-ms", config.connect_timeout_ms),
    ] {
        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&value) {
            return Err(ConfigError::Validation(format!(
                "{} must be between {} and {}, got {}",
                name, MIN_TIMEOUT_MS, MAX_TIMEOUT_MS, value
            )));
        }
    }

    if config.max_redirects > MAX_REDIRECTS {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be <= {}, got {}",
            MAX_REDIRECTS, config.max_redirects
        )));
    }

    Ok(())
}

/// Validates content reduction configuration
fn validate_extractor_config(config: &ExtractorConfig) -> Result<(), ConfigError> {
    if config.max_text_chars == Some(0) {
        return Err(ConfigError::Validation(
            "max-text-chars must be >= 1 when set".to_string(),
        ));
    }

    for pattern in &config.dynamic_render_hosts {
        validate_host_pattern(pattern)?;
    }

    Ok(())
}

/// Validates batch configuration
fn validate_batch_config(config: &BatchConfig) -> Result<(), ConfigError> {
    if config.max_concurrency < 1 || config.max_concurrency > MAX_BATCH_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "max-concurrency must be between 1 and {}, got {}",
            MAX_BATCH_CONCURRENCY, config.max_concurrency
        )));
    }
    Ok(())
}

/// Validates the background lookup base URL
fn validate_background_config(config: &BackgroundConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.wiki_base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid wiki-base-url: {}", e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "wiki-base-url '{}' must use http or https",
            config.wiki_base_url
        )));
    }

    if !url.path().ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "wiki-base-url '{}' must end with '/'",
            config.wiki_base_url
        )));
    }

    Ok(())
}

/// Validates that every role override names a known role
fn validate_role_overrides<V>(roles: &BTreeMap<String, V>) -> Result<(), ConfigError> {
    for name in roles.keys() {
        name.parse::<Role>().map_err(ConfigError::Validation)?;
    }
    Ok(())
}

/// Validates a host pattern (supports a leading "*." wildcard)
fn validate_host_pattern(pattern: &str) -> Result<(), ConfigError> {
    let host = pattern.strip_prefix("*.").unwrap_or(pattern);

    if host.is_empty() {
        return Err(ConfigError::InvalidPattern(format!(
            "Host pattern '{}' has no host",
            pattern
        )));
    }

    if !host
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' contains invalid characters",
            host
        )));
    }

    if host.starts_with('.')
        || host.ends_with('.')
        || host.starts_with('-')
        || host.ends_with('-')
        || host.contains("..")
    {
        return Err(ConfigError::InvalidPattern(format!(
            "Host '{}' is malformed",
            host
        )));
    }

    Ok(())
}
