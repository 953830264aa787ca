use crate::config::types::{CrawlSettings, MirrorConfig, OutputSettings, SessionSettings};
use crate::ConfigError;
use std::path::Path;
use url::Url;

/// Minimum per-page timeout (milliseconds)
const MIN_TIMEOUT_MS: u64 = 100;

/// Validates the entire configuration
pub fn validate(config: &MirrorConfig) -> Result<(), ConfigError> {
    validate_crawl_settings(&config.crawl)?;
    validate_session_settings(&config.session)?;
    validate_output_settings(&config.output)?;
    Ok(())
}

/// Validates crawl settings
fn validate_crawl_settings(config: &CrawlSettings) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max-pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.timeout_ms < MIN_TIMEOUT_MS {
        return Err(ConfigError::Validation(format!(
            "timeout-ms must be >= {}ms, got {}ms",
            MIN_TIMEOUT_MS, config.timeout_ms
        )));
    }

    for prefix in &config.url_prefixes {
        let url = Url::parse(prefix)
            .map_err(|e| ConfigError::InvalidUrl(format!("URL prefix '{}': {}", prefix, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "URL prefix '{}' must use http or https",
                prefix
            )));
        }
    }

    if config.skip_paths.iter().any(|p| p.trim().is_empty()) {
        return Err(ConfigError::Validation(
            "skip-paths cannot contain empty entries".to_string(),
        ));
    }

    Ok(())
}

/// Validates session settings
fn validate_session_settings(config: &SessionSettings) -> Result<(), ConfigError> {
    ensure_path("auth-file", &config.auth_file)?;

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates output settings
fn validate_output_settings(config: &OutputSettings) -> Result<(), ConfigError> {
    ensure_path("output-dir", &config.output_dir)?;
    if let Some(state_file) = &config.state_file {
        ensure_path("state-file", state_file)?;
    }
    Ok(())
}

fn ensure_path(key: &str, path: &Path) -> Result<(), ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::Validation(format!("{} cannot be empty", key)));
    }
    Ok(())
}
