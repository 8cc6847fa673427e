use crate::config::types::{Config, CrawlerConfig, HttpConfig, SelectorConfig};
use crate::crawler::MarkupProfile;
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    validate_selectors(&config.selectors)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    let seed = Url::parse(&config.seed_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", config.seed_url, e))
    })?;

    if seed.scheme() != "http" && seed.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Seed URL '{}' must use HTTP or HTTPS",
            config.seed_url
        )));
    }

    if config.max_concurrent_requests < 1 || config.max_concurrent_requests > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_requests must be between 1 and 100, got {}",
            config.max_concurrent_requests
        )));
    }

    if config.max_pages == Some(0) {
        return Err(ConfigError::Validation(
            "max_pages must be >= 1 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    // Header values cannot carry control characters
    if config.user_agent.chars().any(char::is_control) {
        return Err(ConfigError::Validation(
            "user_agent must not contain control characters".to_string(),
        ));
    }

    if config.request_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 1s, got {}s",
            config.request_timeout
        )));
    }

    if config.connect_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "connect_timeout must be >= 1s, got {}s",
            config.connect_timeout
        )));
    }

    Ok(())
}

/// Validates that every role selector compiles
fn validate_selectors(config: &SelectorConfig) -> Result<(), ConfigError> {
    if config.infobox_class.trim().is_empty() {
        return Err(ConfigError::Validation(
            "infobox_class cannot be empty".to_string(),
        ));
    }

    MarkupProfile::from_config(config).map(|_| ())
}
