use crate::state::{CrawlConfig, CrawlState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// A crawl identity plus its progress, as persisted between runs
///
/// List and counter fields default when absent so hand-edited or older
/// files still load; the start URL and domain-only flag are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub start_url: String,

    pub domain_only: bool,

    #[serde(default)]
    pub skipped_paths: Vec<String>,

    #[serde(default)]
    pub url_prefixes: Vec<String>,

    #[serde(default)]
    pub skip_existing: bool,

    /// Pending URLs in queue order
    #[serde(default)]
    pub queue: Vec<String>,

    /// Visited URLs, sorted
    #[serde(default)]
    pub visited: Vec<String>,

    #[serde(default)]
    pub saved: u64,

    #[serde(default)]
    pub failed: u64,

    /// When the checkpoint was written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Checkpoint {
    /// Captures the current crawl identity and state
    pub fn capture(config: &CrawlConfig, state: &CrawlState) -> Self {
        let mut visited: Vec<String> = state.visited.iter().cloned().collect();
        visited.sort_unstable();

        Self {
            start_url: config.start_url.clone(),
            domain_only: config.domain_only,
            skipped_paths: config.skipped_paths.clone(),
            url_prefixes: config.url_prefixes.clone(),
            skip_existing: config.skip_existing,
            queue: state.queue.iter().cloned().collect(),
            visited,
            saved: state.saved,
            failed: state.failed,
            updated_at: Some(Utc::now()),
        }
    }

    /// The crawl identity this checkpoint was written under
    ///
    /// Built field-by-field without validation: a checkpoint is compared,
    /// never crawled from directly.
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            start_url: self.start_url.clone(),
            domain_only: self.domain_only,
            skipped_paths: self.skipped_paths.clone(),
            url_prefixes: self.url_prefixes.clone(),
            skip_existing: self.skip_existing,
        }
    }

    /// The crawl progress stored in this checkpoint
    pub fn into_state(self) -> CrawlState {
        CrawlState {
            queue: VecDeque::from(self.queue),
            visited: self.visited.into_iter().collect::<HashSet<_>>(),
            saved: self.saved,
            failed: self.failed,
        }
    }
}
