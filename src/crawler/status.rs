//! Per-URL crawl progress notifications

use std::fmt;

/// What just happened to a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusEvent {
    /// Admitted; the fetch is about to start
    Visiting,
    /// Fetched and written to disk
    Saved,
    /// Fetch or save failed
    Failed,
    /// Rejected by the scheme, extension, URL prefix or domain check
    Filtered,
    /// Rejected by a skipped path
    Skipped,
    /// Rejected because its output file already exists
    Existing,
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Visiting => "visiting",
            Self::Saved => "saved",
            Self::Failed => "failed",
            Self::Filtered => "filtered",
            Self::Skipped => "skipped",
            Self::Existing => "existing",
        };
        f.write_str(name)
    }
}

/// One progress notification with counters taken after the event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub event: StatusEvent,
    pub url: String,
    pub visited: usize,
    pub saved: u64,
    pub failed: u64,
    pub queued: usize,
}

/// Receives crawl progress notifications
pub trait StatusSink: Send + Sync {
    fn notify(&self, update: &StatusUpdate);
}

impl<F> StatusSink for F
where
    F: Fn(&StatusUpdate) + Send + Sync,
{
    fn notify(&self, update: &StatusUpdate) {
        self(update)
    }
}

/// Prints one line per notification to stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleStatus;

impl ConsoleStatus {
    /// Renders a notification as a status line
    pub fn format(update: &StatusUpdate) -> String {
        format!(
            "{} url={} visited={} saved={} failed={} queued={}",
            update.event.to_string().to_uppercase(),
            update.url,
            update.visited,
            update.saved,
            update.failed,
            update.queued
        )
    }
}

impl StatusSink for ConsoleStatus {
    fn notify(&self, update: &StatusUpdate) {
        println!("{}", Self::format(update));
    }
}
