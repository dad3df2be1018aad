use crate::config::types::{
    Config, OutputConfig, ScraperConfig, SiteConfig, SummaryConfig, UserAgentConfig,
};
use crate::ConfigError;
use regex::Regex;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scraper_config(&config.scraper)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_summary_config(&config.summary)?;
    validate_output_config(&config.output)?;
    validate_site_config(&config.site)?;
    Ok(())
}

/// Validates scrape pipeline configuration
fn validate_scraper_config(config: &ScraperConfig) -> Result<(), ConfigError> {
    let base = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if base.scheme() != "http" && base.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            config.base_url
        )));
    }

    base.join(&config.author_index_path).map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid author_index_path '{}': {}",
            config.author_index_path, e
        ))
    })?;

    validate_link_filter("author", &config.author_link, &config.author_link_pattern)?;
    validate_link_filter("work", &config.work_link, &config.work_link_pattern)?;

    if config.text_link_markers.is_empty() || config.text_link_markers.iter().any(|m| m.is_empty())
    {
        return Err(ConfigError::Validation(
            "text_link_markers must contain at least one non-empty marker".to_string(),
        ));
    }

    Selector::parse(&config.content_selector).map_err(|_| {
        ConfigError::Validation(format!(
            "content_selector is not a valid CSS selector: '{}'",
            config.content_selector
        ))
    })?;

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "request_timeout_secs must be >= 1".to_string(),
        ));
    }

    if config.max_authors < 1 {
        return Err(ConfigError::Validation(format!(
            "max_authors must be >= 1, got {}",
            config.max_authors
        )));
    }

    if config.works_per_author < 1 {
        return Err(ConfigError::Validation(format!(
            "works_per_author must be >= 1, got {}",
            config.works_per_author
        )));
    }

    if config.probe_windows.is_empty() {
        return Err(ConfigError::Validation(
            "probe_windows cannot be empty".to_string(),
        ));
    }

    for [start, end] in &config.probe_windows {
        if start >= end {
            return Err(ConfigError::Validation(format!(
                "probe window [{}, {}) is empty",
                start, end
            )));
        }
    }

    if encoding_rs::Encoding::for_label(config.fallback_encoding.as_bytes()).is_none() {
        return Err(ConfigError::Validation(format!(
            "Unknown fallback_encoding '{}'",
            config.fallback_encoding
        )));
    }

    Ok(())
}

/// Validates a substring marker and its optional regex override
fn validate_link_filter(
    kind: &str,
    marker: &str,
    pattern: &Option<String>,
) -> Result<(), ConfigError> {
    match pattern {
        Some(pattern) => {
            Regex::new(pattern).map_err(|e| {
                ConfigError::InvalidPattern(format!("{}_link_pattern '{}': {}", kind, pattern, e))
            })?;
        }
        None if marker.is_empty() => {
            return Err(ConfigError::Validation(format!(
                "{}_link cannot be empty",
                kind
            )));
        }
        None => {}
    }
    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.agent_name.is_empty() {
        return Err(ConfigError::Validation(
            "agent_name cannot be empty".to_string(),
        ));
    }

    if !config
        .agent_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "agent_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.agent_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

fn validate_summary_config(config: &SummaryConfig) -> Result<(), ConfigError> {
    if config.max_chars < 1 {
        return Err(ConfigError::Validation(
            "summary max_chars must be >= 1".to_string(),
        ));
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.site_dir.is_empty() {
        return Err(ConfigError::Validation(
            "site_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    if config.title.trim().is_empty() {
        return Err(ConfigError::Validation(
            "site title cannot be empty".to_string(),
        ));
    }

    // Lower bound keeps the "untitled" fallback and an id suffix within the cap
    if !(16..=200).contains(&config.filename_max_length) {
        return Err(ConfigError::Validation(format!(
            "filename_max_length must be between 16 and 200, got {}",
            config.filename_max_length
        )));
    }

    if config.excerpt_length < 1 {
        return Err(ConfigError::Validation(
            "excerpt_length must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
