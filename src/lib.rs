//! site-mirror: an offline mirror for authenticated websites
//!
//! This crate crawls a site breadth-first using a persisted browser session,
//! saves every page as HTML, and rewrites same-site links into relative paths
//! so the mirror can be browsed from disk. Crawls are resumable through a
//! checkpoint file.

pub mod config;
pub mod crawler;
pub mod output;
pub mod session;
pub mod state;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for site-mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Session error: {0}")]
    Session(#[from] session::SessionError),

    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] storage::CheckpointError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for site-mirror operations
pub type Result<T> = std::result::Result<T, MirrorError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::MirrorConfig;
pub use crawler::{Coordinator, CrawlOptions, CrawlResult, FetchError, Fetcher, HttpFetcher};
pub use output::{rewrite_link, url_to_output_path, HtmlSaver, PageSaver};
pub use session::Session;
pub use state::{CrawlConfig, CrawlState};
pub use storage::{Checkpoint, CheckpointStore};
pub use url::{normalize_url, FilterChain, FilterDecision};
