//! Crawl identity definitions
//!
//! Two crawls with equal identities may share a checkpoint; anything else is
//! treated as a new crawl.

use crate::url::{netloc, normalize_url};
use crate::ConfigError;
use sha2::{Digest, Sha256};
use url::Url;

/// The immutable identity of a crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Start URL, fragment stripped
    pub start_url: String,

    /// Only follow URLs on the start URL's host
    pub domain_only: bool,

    /// Path prefixes that are never fetched
    pub skipped_paths: Vec<String>,

    /// Exact URL prefixes a URL must start with (empty admits all)
    pub url_prefixes: Vec<String>,

    /// Skip URLs whose output file already exists
    pub skip_existing: bool,
}

impl CrawlConfig {
    /// Creates a crawl identity, normalizing and validating the start URL
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlConfig)` - The start URL is an absolute http(s) URL with a host
    /// * `Err(ConfigError)` - The start URL is unusable
    pub fn new(
        start_url: &str,
        domain_only: bool,
        skipped_paths: Vec<String>,
        url_prefixes: Vec<String>,
        skip_existing: bool,
    ) -> Result<Self, ConfigError> {
        let start_url = normalize_url(start_url.trim());
        let parsed = Url::parse(&start_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start URL '{}': {}", start_url, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Start URL '{}' must use http or https",
                start_url
            )));
        }

        if parsed.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Start URL '{}' has no host",
                start_url
            )));
        }

        Ok(Self {
            start_url,
            domain_only,
            skipped_paths,
            url_prefixes,
            skip_existing,
        })
    }

    /// Returns the site host (network location of the start URL)
    pub fn site_host(&self) -> String {
        Url::parse(&self.start_url)
            .map(|u| netloc(&u))
            .unwrap_or_default()
    }

    /// Returns true if a checkpoint written under `other` may be resumed under `self`
    ///
    /// Start URLs are compared after fragment stripping and the prefix lists
    /// are compared as sorted lists, so flag order on the command line does
    /// not matter.
    pub fn is_compatible(&self, other: &CrawlConfig) -> bool {
        normalize_url(&self.start_url) == normalize_url(&other.start_url)
            && self.domain_only == other.domain_only
            && sorted(&self.skipped_paths) == sorted(&other.skipped_paths)
            && sorted(&self.url_prefixes) == sorted(&other.url_prefixes)
            && self.skip_existing == other.skip_existing
    }

    /// Hex SHA-256 digest of the order-normalized identity
    ///
    /// Compatible configs always share a fingerprint.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(normalize_url(&self.start_url).as_bytes());
        hasher.update([0u8, self.domain_only as u8, self.skip_existing as u8]);
        for path in sorted(&self.skipped_paths) {
            hasher.update(b"\0path:");
            hasher.update(path.as_bytes());
        }
        for prefix in sorted(&self.url_prefixes) {
            hasher.update(b"\0prefix:");
            hasher.update(prefix.as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

fn sorted(items: &[String]) -> Vec<&str> {
    let mut items: Vec<&str> = items.iter().map(String::as_str).collect();
    items.sort_unstable();
    items
}
