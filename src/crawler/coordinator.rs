//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop, which:
//! - Restores progress from a compatible checkpoint
//! - Runs each dequeued URL through the filter chain
//! - Fetches, saves and harvests links from admitted pages
//! - Persists a checkpoint after every processed URL
//!
//! Processing is strictly sequential: one URL is fully handled before the
//! next one leaves the queue.

use crate::crawler::status::{StatusEvent, StatusSink, StatusUpdate};
use crate::crawler::{FetchError, FetchedPage, Fetcher};
use crate::output::PageSaver;
use crate::state::{CrawlConfig, CrawlState};
use crate::storage::{default_state_file, is_compatible, Checkpoint, CheckpointStore};
use crate::url::{normalize_url, FilterChain, FilterDecision};
use crate::MirrorError;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Default maximum number of URLs to visit
pub const DEFAULT_MAX_PAGES: usize = 100;

/// Default pause after each fetched URL
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Default per-page fetch timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Runtime options of a crawl that are not part of its identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Directory pages are written under
    pub output_dir: PathBuf,

    /// Maximum number of visited URLs, rejected ones included
    pub max_pages: usize,

    /// Pause after each fetched URL
    pub delay: Duration,

    /// Per-page fetch timeout
    pub timeout: Duration,

    /// Load and write a checkpoint
    pub resume: bool,

    /// Checkpoint file path
    pub state_file: PathBuf,
}

impl CrawlOptions {
    /// Creates options with defaults for the given output directory
    ///
    /// The checkpoint defaults to `.crawl_state.json` inside `output_dir`.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        let state_file = default_state_file(&output_dir);
        Self {
            output_dir,
            max_pages: DEFAULT_MAX_PAGES,
            delay: DEFAULT_DELAY,
            timeout: DEFAULT_TIMEOUT,
            resume: false,
            state_file,
        }
    }
}

/// Counters reported when a crawl finishes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlResult {
    pub saved_pages: u64,
    pub visited_pages: usize,
    pub failed_pages: u64,
}

impl From<&CrawlState> for CrawlResult {
    fn from(state: &CrawlState) -> Self {
        Self {
            saved_pages: state.saved,
            visited_pages: state.visited_count(),
            failed_pages: state.failed,
        }
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: CrawlConfig,
    options: CrawlOptions,
    site_host: String,
    fetcher: Box<dyn Fetcher>,
    saver: Box<dyn PageSaver>,
    status: Option<Box<dyn StatusSink>>,
    store: CheckpointStore,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl identity (start URL and filters)
    /// * `options` - Output directory, limits and checkpoint settings
    /// * `fetcher` - Loads pages
    /// * `saver` - Writes pages to disk
    pub fn new(
        config: CrawlConfig,
        options: CrawlOptions,
        fetcher: impl Fetcher + 'static,
        saver: impl PageSaver + 'static,
    ) -> Self {
        let site_host = config.site_host();
        let store = CheckpointStore::new(&options.state_file);

        Self {
            config,
            options,
            site_host,
            fetcher: Box::new(fetcher),
            saver: Box::new(saver),
            status: None,
            store,
        }
    }

    /// Sends a notification to `sink` for every processed URL
    pub fn with_status(mut self, sink: impl StatusSink + 'static) -> Self {
        self.status = Some(Box::new(sink));
        self
    }

    /// Runs the crawl until the queue drains or `max_pages` URLs were visited
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - Final counters, including progress restored from a checkpoint
    /// * `Err(MirrorError)` - The output directory or checkpoint could not be written
    pub async fn run(self) -> Result<CrawlResult, MirrorError> {
        info!(
            "Starting crawl of {} (max {} pages, output {})",
            self.config.start_url,
            self.options.max_pages,
            self.options.output_dir.display()
        );

        fs::create_dir_all(&self.options.output_dir)?;

        let mut state = self.initial_state();
        while !state.is_drained() && state.visited_count() < self.options.max_pages {
            state = self.process_next(state).await?;
        }

        if state.is_drained() {
            info!("Queue drained, crawl complete");
            if self.options.resume {
                self.store.delete()?;
            }
        } else {
            info!(
                "Reached {} visited pages with {} URLs still queued",
                state.visited_count(),
                state.queue.len()
            );
        }

        let result = CrawlResult::from(&state);
        info!(
            "Crawl finished: {} saved, {} visited, {} failed",
            result.saved_pages, result.visited_pages, result.failed_pages
        );
        Ok(result)
    }

    /// Loads a compatible checkpoint when resuming, otherwise a fresh state
    fn initial_state(&self) -> CrawlState {
        let fresh = CrawlState::fresh(&self.config.start_url);
        if !self.options.resume {
            return fresh;
        }

        match self.store.load() {
            Ok(Some(checkpoint)) => {
                if is_compatible(&checkpoint.crawl_config(), &self.config) {
                    let state = checkpoint.into_state();
                    info!(
                        "Resuming from {} ({} visited, {} queued)",
                        self.store.path().display(),
                        state.visited_count(),
                        state.queue.len()
                    );
                    state
                } else {
                    info!(
                        "Checkpoint {} was written for a different crawl, starting fresh",
                        self.store.path().display()
                    );
                    fresh
                }
            }
            Ok(None) => {
                debug!("No checkpoint at {}", self.store.path().display());
                fresh
            }
            Err(e) => {
                warn!("Ignoring unreadable checkpoint: {}", e);
                fresh
            }
        }
    }

    /// Takes one URL off the queue and handles it completely
    ///
    /// # Flow
    ///
    /// 1. Already visited → dropped without any other effect
    /// 2. Marked visited, then run through the filter chain
    /// 3. Rejected → notified as filtered, skipped or existing
    /// 4. Admitted → fetched, saved, links harvested (or counted as failed)
    /// 5. Checkpoint written
    /// 6. Admitted URLs only: pause for the configured delay
    pub async fn process_next(&self, mut state: CrawlState) -> Result<CrawlState, MirrorError> {
        let Some(url) = state.pop_next() else {
            return Ok(state);
        };

        if state.is_visited(&url) {
            debug!("Already visited: {}", url);
            return Ok(state);
        }
        state.mark_visited(&url);

        let chain = FilterChain::new(&self.config, &self.site_host, &self.options.output_dir);
        let decision = chain.evaluate(&url);

        if let Some(event) = rejection_event(decision) {
            debug!("Rejected {} ({})", url, decision);
            self.notify(event, &url, &state);
            self.save_checkpoint(&state)?;
            return Ok(state);
        }

        self.notify(StatusEvent::Visiting, &url, &state);

        match self.fetch(&url).await {
            Ok(page) => match self.saver.save(
                &url,
                &page.html,
                &self.options.output_dir,
                &self.site_host,
            ) {
                Ok(_) => {
                    state.saved += 1;
                    self.notify(StatusEvent::Saved, &url, &state);
                    enqueue_links(&mut state, &chain, &url, &page.links);
                }
                Err(e) => {
                    state.failed += 1;
                    warn!("Failed to save {}: {}", url, e);
                    self.notify(StatusEvent::Failed, &url, &state);
                }
            },
            Err(e) => {
                state.failed += 1;
                warn!("{}", e);
                self.notify(StatusEvent::Failed, &url, &state);
            }
        }

        self.save_checkpoint(&state)?;

        if !self.options.delay.is_zero() {
            tokio::time::sleep(self.options.delay).await;
        }

        Ok(state)
    }

    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let timeout = self.options.timeout;
        match tokio::time::timeout(timeout, self.fetcher.fetch(url, timeout)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
        }
    }

    fn save_checkpoint(&self, state: &CrawlState) -> Result<(), MirrorError> {
        if self.options.resume {
            self.store.save(&Checkpoint::capture(&self.config, state))?;
        }
        Ok(())
    }

    fn notify(&self, event: StatusEvent, url: &str, state: &CrawlState) {
        if let Some(sink) = &self.status {
            sink.notify(&StatusUpdate {
                event,
                url: url.to_string(),
                visited: state.visited_count(),
                saved: state.saved,
                failed: state.failed,
                queued: state.queue.len(),
            });
        }
    }
}

/// Status event for a rejected URL, or `None` if it was admitted
fn rejection_event(decision: FilterDecision) -> Option<StatusEvent> {
    match decision {
        FilterDecision::Admit => None,
        FilterDecision::RejectPathSkip => Some(StatusEvent::Skipped),
        FilterDecision::RejectExisting => Some(StatusEvent::Existing),
        FilterDecision::RejectScheme
        | FilterDecision::RejectExtension
        | FilterDecision::RejectPrefix
        | FilterDecision::RejectDomain => Some(StatusEvent::Filtered),
    }
}

/// Appends the admissible links of a page to the queue tail
fn enqueue_links(state: &mut CrawlState, chain: &FilterChain<'_>, page_url: &str, links: &[String]) {
    let Ok(base) = Url::parse(page_url) else {
        return;
    };

    let mut added = 0;
    for link in links {
        let Ok(resolved) = base.join(link) else {
            continue;
        };
        let candidate = normalize_url(resolved.as_str());
        if chain.admit_link(&candidate).is_admitted() && state.enqueue(candidate) {
            added += 1;
        }
    }

    debug!("Queued {} of {} links from {}", added, links.len(), page_url);
}
