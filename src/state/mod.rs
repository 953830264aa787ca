//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlConfig`: the immutable identity of a crawl, used to decide whether
//!   a checkpoint may be resumed
//! - `CrawlState`: the queue, visited set and counters that the crawl engine
//!   threads through its loop and checkpoints after every processed URL

mod crawl_config;
mod crawl_state;

// Re-export main types
pub use crawl_config::CrawlConfig;
pub use crawl_state::CrawlState;
