use crate::config::types::CrawlConfig;
use crate::ConfigError;

/// Hard ceiling on parallel fetches, whatever the caller asks for
pub const MAX_WORKERS_CEILING: usize = 128;

/// Validates the entire configuration
pub fn validate(config: &CrawlConfig) -> Result<(), ConfigError> {
    validate_workers(config.max_workers)?;
    validate_timeouts(config)?;
    validate_user_agent(config)?;
    Ok(())
}

fn validate_workers(max_workers: Option<usize>) -> Result<(), ConfigError> {
    match max_workers {
        Some(0) => Err(ConfigError::Validation(
            "max_workers must be at least 1".to_string(),
        )),
        Some(n) if n > MAX_WORKERS_CEILING => Err(ConfigError::Validation(format!(
            "max_workers must be at most {}, got {}",
            MAX_WORKERS_CEILING, n
        ))),
        _ => Ok(()),
    }
}

fn validate_timeouts(config: &CrawlConfig) -> Result<(), ConfigError> {
    if config.request_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "request_timeout_ms must be greater than 0".to_string(),
        ));
    }

    if config.connect_timeout_ms == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout_ms must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// The user agent ends up in an HTTP header: no control characters allowed
fn validate_user_agent(config: &CrawlConfig) -> Result<(), ConfigError> {
    let agent = config.user_agent_string();

    if agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if agent.chars().any(|c| c.is_control()) {
        return Err(ConfigError::Validation(format!(
            "user_agent contains control characters: {:?}",
            agent
        )));
    }

    Ok(())
}
