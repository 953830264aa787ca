use crate::config::types::MirrorConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(MirrorConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<MirrorConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<MirrorConfig, ConfigError> {
    let config: MirrorConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Loads the configuration file if one is given, otherwise the defaults
pub fn load_config_or_default(path: Option<&Path>) -> Result<MirrorConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(MirrorConfig::default()),
    }
}
