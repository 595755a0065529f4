use crate::config::types::{BoardConfig, Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on concurrent post extractions within one page
const MAX_CONCURRENT_POSTS: usize = 32;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_board_config(&config.board)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.pages < 1 {
        return Err(ConfigError::Validation(format!(
            "pages must be >= 1, got {}",
            config.pages
        )));
    }

    if config.max_concurrent_posts < 1 || config.max_concurrent_posts > MAX_CONCURRENT_POSTS {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_posts must be between 1 and {}, got {}",
            MAX_CONCURRENT_POSTS, config.max_concurrent_posts
        )));
    }

    Ok(())
}

/// Validates the board section
fn validate_board_config(config: &BoardConfig) -> Result<(), ConfigError> {
    let host = Url::parse(&config.host)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid host '{}': {}", config.host, e)))?;

    if host.scheme() != "http" && host.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "host '{}' must use http or https",
            config.host
        )));
    }

    if config.name.is_empty() || config.name.contains('/') {
        return Err(ConfigError::Validation(format!(
            "board name must be non-empty and must not contain '/', got '{}'",
            config.name
        )));
    }

    if !config.start_page.ends_with(".html") || config.start_page.contains('/') {
        return Err(ConfigError::Validation(format!(
            "start_page must be a listing file such as 'index.html', got '{}'",
            config.start_page
        )));
    }

    for (field, value) in [
        ("source", &config.source),
        ("sale_marker", &config.sale_marker),
        ("reply_marker", &config.reply_marker),
    ] {
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", field)));
        }
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.records_dir.is_empty() {
        return Err(ConfigError::Validation(
            "records_dir cannot be empty".to_string(),
        ));
    }

    if config.checkpoint_path.is_empty() {
        return Err(ConfigError::Validation(
            "checkpoint_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !domain.contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
