//! Crawl frontier and visited-set
//!
//! The frontier is the work queue of `(url, depth)` tasks awaiting a fetch.
//! Admission into it goes through the [`VisitedSet`], so a URL is queued at
//! most once per crawl regardless of how many pages link to it.

use crate::config::FrontierOrder;
use std::collections::{HashSet, VecDeque};
use std::sync::{Mutex, PoisonError};

/// A URL awaiting a fetch, tagged with its link distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: String,
    pub depth: usize,
}

impl CrawlTask {
    pub fn new(url: impl Into<String>, depth: usize) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Thread-safe set of URLs already queued or fetched
///
/// Test and insert happen under one lock, so concurrent callers racing on the
/// same URL see exactly one `true`.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `url`, returning `true` only if it was not present
    pub fn insert(&self, url: &str) -> bool {
        let mut urls = self.urls.lock().unwrap_or_else(PoisonError::into_inner);
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ordered, de-duplicated queue of crawl tasks
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<CrawlTask>,
    visited: VisitedSet,
    order: FrontierOrder,
}

impl Frontier {
    pub fn new(order: FrontierOrder) -> Self {
        Self {
            queue: VecDeque::new(),
            visited: VisitedSet::new(),
            order,
        }
    }

    /// Queues `url` at `depth` unless it was queued before
    ///
    /// # Returns
    ///
    /// * `true` - The URL was new and is now queued
    /// * `false` - The URL was already visited or queued; nothing changed
    pub fn try_enqueue(&mut self, url: impl Into<String>, depth: usize) -> bool {
        let url = url.into();
        if !self.visited.insert(&url) {
            return false;
        }

        self.queue.push_back(CrawlTask { url, depth });
        true
    }

    /// Marks `url` as visited without queueing it
    ///
    /// Used for the seed, which is fetched outside the queue.
    pub fn mark_visited(&self, url: &str) -> bool {
        self.visited.insert(url)
    }

    /// Takes the next task; `None` means there is no more work
    pub fn dequeue(&mut self) -> Option<CrawlTask> {
        match self.order {
            FrontierOrder::Fifo => self.queue.pop_front(),
            FrontierOrder::Lifo => self.queue.pop_back(),
        }
    }

    /// Number of queued tasks
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
