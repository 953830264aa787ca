use std::collections::{HashSet, VecDeque};

/// Mutable crawl progress, the unit of checkpointing
///
/// The queue may hold duplicates and URLs that were already visited; the
/// crawl engine drops those lazily when they are dequeued. A URL is added to
/// `visited` as soon as it leaves the queue, before anything else happens to
/// it, so no URL is processed twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlState {
    /// Pending URLs in discovery order
    pub queue: VecDeque<String>,

    /// URLs that have left the queue
    pub visited: HashSet<String>,

    /// Pages fetched and written to disk
    pub saved: u64,

    /// Pages whose fetch or save failed
    pub failed: u64,
}

impl CrawlState {
    /// Creates the state of a fresh crawl: just the start URL queued
    pub fn fresh(start_url: &str) -> Self {
        Self {
            queue: VecDeque::from([start_url.to_string()]),
            ..Self::default()
        }
    }

    /// Removes and returns the URL at the head of the queue
    pub fn pop_next(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// Marks a URL as visited; returns false if it already was
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    /// Returns true if the URL has already left the queue
    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Appends a URL to the queue tail unless it was already visited
    ///
    /// Queue membership is not checked; duplicates resolve at dequeue.
    pub fn enqueue(&mut self, url: String) -> bool {
        if self.visited.contains(&url) {
            return false;
        }
        self.queue.push_back(url);
        true
    }

    /// Number of visited URLs
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Returns true if there is nothing left to process
    pub fn is_drained(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_state() {
        let state = CrawlState::fresh("https://example.com/");
        assert_eq!(state.queue.len(), 1);
        assert!(state.visited.is_empty());
        assert_eq!(state.saved, 0);
        assert_eq!(state.failed, 0);
    }

    #[test]
    fn test_fifo_order() {
        let mut state = CrawlState::fresh("a");
        state.enqueue("b".to_string());
        state.enqueue("c".to_string());
        assert_eq!(state.pop_next().as_deref(), Some("a"));
        assert_eq!(state.pop_next().as_deref(), Some("b"));
        assert_eq!(state.pop_next().as_deref(), Some("c"));
        assert_eq!(state.pop_next(), None);
    }

    #[test]
    fn test_enqueue_skips_visited_but_allows_queue_duplicates() {
        let mut state = CrawlState::default();
        state.mark_visited("a");
        assert!(!state.enqueue("a".to_string()));
        assert!(state.enqueue("b".to_string()));
        assert!(state.enqueue("b".to_string()));
        assert_eq!(state.queue.len(), 2);
    }

    #[test]
    fn test_mark_visited_once() {
        let mut state = CrawlState::default();
        assert!(state.mark_visited("a"));
        assert!(!state.mark_visited("a"));
        assert_eq!(state.visited_count(), 1);
        assert!(state.is_visited("a"));
    }
}
