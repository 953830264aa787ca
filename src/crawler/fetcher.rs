//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building an HTTP client that carries the session cookies
//! - GET requests bounded by a per-request timeout
//! - Classifying failures into fetch errors
//! - Harvesting anchor links from the fetched HTML

use crate::crawler::parser::{extract_anchor_hrefs, resolve_hrefs};
use crate::session::Session;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// HTML content types accepted as pages
const HTML_CONTENT_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

/// A successfully fetched page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedPage {
    /// Page HTML as received
    pub html: String,

    /// Anchor targets in document order, resolved against the final page URL
    pub links: Vec<String>,
}

/// Reasons a page could not be fetched
///
/// Every variant is recovered by the crawl engine: the page is counted as
/// failed and the crawl moves on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Timed out fetching {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Not an HTML page ({content_type}): {url}")]
    ContentMismatch { url: String, content_type: String },

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },
}

impl FetchError {
    /// The URL the failed fetch was for
    pub fn url(&self) -> &str {
        match self {
            Self::Timeout { url }
            | Self::Status { url, .. }
            | Self::ContentMismatch { url, .. }
            | Self::Transport { url, .. } => url,
        }
    }
}

/// Loads a page and reports its HTML and outgoing links
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url`, giving up after `timeout`
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError>;
}

/// Fetcher backed by a reqwest client holding the session cookies
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher that authenticates with `session`
    ///
    /// # Arguments
    ///
    /// * `session` - The persisted session whose cookies are sent with every request
    /// * `user_agent` - The User-Agent header value
    ///
    /// # Returns
    ///
    /// * `Ok(HttpFetcher)` - Successfully built HTTP client
    /// * `Err(MirrorError::Http)` - Failed to build client
    pub fn new(session: &Session, user_agent: &str) -> crate::Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .cookie_provider(Arc::new(session.cookie_jar()))
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    /// Fetches a page with a single GET request
    ///
    /// # Error Mapping
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Request or body read times out | `Timeout` |
    /// | Non-2xx status (after redirects) | `Status` |
    /// | Content-Type present and not HTML | `ContentMismatch` |
    /// | Any other transport failure | `Transport` |
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !is_html_content_type(content_type) {
                return Err(FetchError::ContentMismatch {
                    url: url.to_string(),
                    content_type: content_type.to_string(),
                });
            }
        }

        let final_url = response.url().clone();
        let html = response.text().await.map_err(|e| classify_error(url, e))?;
        let links = resolve_hrefs(&final_url, extract_anchor_hrefs(&html));

        Ok(FetchedPage { html, links })
    }
}

fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Transport {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}

/// Returns true if a Content-Type header value names an HTML media type
fn is_html_content_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    HTML_CONTENT_TYPES.contains(&media_type.as_str())
}
