//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with session cookies
//! - HTML link extraction
//! - Progress notifications
//! - Overall crawl coordination with checkpointing

mod coordinator;
mod fetcher;
mod parser;
mod status;

pub use coordinator::{Coordinator, CrawlOptions, CrawlResult};
pub use fetcher::{FetchError, FetchedPage, Fetcher, HttpFetcher};
pub use parser::{extract_anchor_hrefs, resolve_href, resolve_hrefs};
pub use status::{ConsoleStatus, StatusEvent, StatusSink, StatusUpdate};
