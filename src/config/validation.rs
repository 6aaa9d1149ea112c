use crate::config::types::{Config, DiscoveryConfig, FetchConfig, OutputConfig, TaggingConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_fetch_config(&config.fetch)?;
    validate_discovery_config(&config.discovery)?;
    validate_output_config(&config.output)?;
    validate_tagging_config(&config.tagging)?;
    Ok(())
}

/// Validates fetch configuration
fn validate_fetch_config(config: &FetchConfig) -> Result<(), ConfigError> {
    if config.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout-secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.connect_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "connect-timeout-secs must be >= 1, got {}",
            config.connect_timeout_secs
        )));
    }

    if config.concurrent_fetches < 1 || config.concurrent_fetches > 16 {
        return Err(ConfigError::Validation(format!(
            "concurrent-fetches must be between 1 and 16, got {}",
            config.concurrent_fetches
        )));
    }

    if config.report_every < 1 {
        return Err(ConfigError::Validation(format!(
            "report-every must be >= 1, got {}",
            config.report_every
        )));
    }

    Ok(())
}

/// Validates discovery configuration
fn validate_discovery_config(config: &DiscoveryConfig) -> Result<(), ConfigError> {
    if config.entry_seeds.is_empty() && config.section_seeds.is_empty() {
        return Err(ConfigError::Validation(
            "at least one of entry-seeds or section-seeds must be provided".to_string(),
        ));
    }

    for seed in config.entry_seeds.iter().chain(&config.section_seeds) {
        let url = Url::parse(seed)
            .map_err(|e| ConfigError::InvalidUrl(format!("seed '{}': {}", seed, e)))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "seed '{}' must use http or https",
                seed
            )));
        }
    }

    if config.entry_markers.is_empty() {
        return Err(ConfigError::Validation(
            "entry-markers cannot be empty".to_string(),
        ));
    }

    if !config.section_seeds.is_empty() && config.section_markers.is_empty() {
        return Err(ConfigError::Validation(
            "section-markers cannot be empty when section-seeds are provided".to_string(),
        ));
    }

    if config.entry_markers.iter().any(String::is_empty)
        || config.section_markers.iter().any(String::is_empty)
    {
        return Err(ConfigError::Validation(
            "link markers cannot contain empty strings".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.corpus_path.is_empty() {
        return Err(ConfigError::Validation(
            "corpus-path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates tagging configuration
///
/// Tags are checked for shape here; membership in the controlled vocabulary
/// is checked at startup once the vocabulary itself is loaded.
fn validate_tagging_config(config: &TaggingConfig) -> Result<(), ConfigError> {
    if config.category.is_empty() {
        return Err(ConfigError::Validation(
            "category cannot be empty".to_string(),
        ));
    }

    if config.tags.is_empty() {
        return Err(ConfigError::Validation(
            "tags cannot be empty".to_string(),
        ));
    }

    if config.tags.iter().any(String::is_empty) {
        return Err(ConfigError::Validation(
            "tags cannot contain empty strings".to_string(),
        ));
    }

    Ok(())
}
