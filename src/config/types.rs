use crate::crawler::CrawlOptions;
use crate::state::CrawlConfig;
use crate::storage::default_state_file;
use crate::ConfigError;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// User-Agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("site-mirror/", env!("CARGO_PKG_VERSION"));

/// Main configuration structure for site-mirror
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MirrorConfig {
    pub crawl: CrawlSettings,
    pub session: SessionSettings,
    pub output: OutputSettings,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CrawlSettings {
    /// Maximum number of URLs to visit, rejected ones included
    pub max_pages: usize,

    /// Pause after each fetched page (milliseconds)
    pub delay_ms: u64,

    /// Per-page fetch timeout (milliseconds)
    pub timeout_ms: u64,

    /// Only follow links on the start URL's host
    pub domain_only: bool,

    /// URL path prefixes that are never fetched
    pub skip_paths: Vec<String>,

    /// Exact URL prefixes a URL must start with
    pub url_prefixes: Vec<String>,

    /// Skip URLs whose output file already exists
    pub skip_existing: bool,

    /// Load and write a checkpoint
    pub resume: bool,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_pages: 100,
            delay_ms: 500,
            timeout_ms: 30_000,
            domain_only: false,
            skip_paths: Vec::new(),
            url_prefixes: Vec::new(),
            skip_existing: false,
            resume: false,
        }
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SessionSettings {
    /// Path to the storage-state JSON file
    pub auth_file: PathBuf,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            auth_file: PathBuf::from(crate::session::DEFAULT_AUTH_FILE),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct OutputSettings {
    /// Directory pages are written under
    pub output_dir: PathBuf,

    /// Checkpoint path; defaults to `.crawl_state.json` in the output directory
    pub state_file: Option<PathBuf>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("offline"),
            state_file: None,
        }
    }
}

impl MirrorConfig {
    /// The checkpoint path, explicit or derived from the output directory
    pub fn state_file(&self) -> PathBuf {
        self.output
            .state_file
            .clone()
            .unwrap_or_else(|| default_state_file(&self.output.output_dir))
    }

    /// Builds the crawl identity for `start_url` from the crawl settings
    pub fn crawl_config(&self, start_url: &str) -> Result<CrawlConfig, ConfigError> {
        CrawlConfig::new(
            start_url,
            self.crawl.domain_only,
            self.crawl.skip_paths.clone(),
            self.crawl.url_prefixes.clone(),
            self.crawl.skip_existing,
        )
    }

    /// Builds the runtime crawl options
    pub fn crawl_options(&self) -> CrawlOptions {
        CrawlOptions {
            output_dir: self.output.output_dir.clone(),
            max_pages: self.crawl.max_pages,
            delay: Duration::from_millis(self.crawl.delay_ms),
            timeout: Duration::from_millis(self.crawl.timeout_ms),
            resume: self.crawl.resume,
            state_file: self.state_file(),
        }
    }
}
