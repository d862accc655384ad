use crate::config::types::CrawlOptions;
use crate::{ConfigError, ConfigResult};

/// Validates crawl options
pub fn validate(options: &CrawlOptions) -> ConfigResult<()> {
    if options.max_depth < 1 {
        return Err(ConfigError::Validation(format!(
            "max_depth must be >= 1, got {}",
            options.max_depth
        )));
    }

    if options.max_urls < 1 {
        return Err(ConfigError::Validation(format!(
            "max_urls must be >= 1, got {}",
            options.max_urls
        )));
    }

    if options.request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "request_timeout must be greater than 0ms".to_string(),
        ));
    }

    validate_user_agent(&options.user_agent)?;

    Ok(())
}

/// Validates the user agent string: non-empty, printable, single line
fn validate_user_agent(user_agent: &str) -> ConfigResult<()> {
    if user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if user_agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user_agent must not contain control characters, got {:?}",
            user_agent
        )));
    }

    Ok(())
}
