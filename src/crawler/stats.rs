//! Crawl statistics
//!
//! [`CrawlStats`] is the mutable statistics block of a running crawl. Every
//! accessor is safe to call from many tasks at once: integer counters are
//! atomics, URL lists sit behind their own mutex. [`CrawlResult`] is the
//! frozen copy handed back to the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// Insertion-ordered list without repeats
#[derive(Debug, Default)]
struct OrderedUrls {
    seen: HashSet<String>,
    urls: Vec<String>,
}

impl OrderedUrls {
    fn push(&mut self, url: &str) -> bool {
        if !self.seen.insert(url.to_string()) {
            return false;
        }
        self.urls.push(url.to_string());
        true
    }
}

/// Live statistics of a crawl
#[derive(Debug, Default)]
pub struct CrawlStats {
    links_found: AtomicUsize,
    pages_followed: AtomicUsize,
    errors: AtomicUsize,
    discovered: Mutex<OrderedUrls>,
    followed: Mutex<Vec<String>>,
    broken: Mutex<OrderedUrls>,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a link found on a followed page
    ///
    /// Returns `true` and bumps `links_found` only the first time a URL is
    /// seen; callers enqueue the link only in that case.
    pub fn record_link(&self, url: &str) -> bool {
        let added = self
            .discovered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url);

        if added {
            self.links_found.fetch_add(1, Ordering::Relaxed);
        }
        added
    }

    /// Records that a page is being followed (fetched)
    pub fn record_followed(&self, url: &str) {
        self.pages_followed.fetch_add(1, Ordering::Relaxed);
        self.followed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());
    }

    /// Records a page whose fetch answered with an HTTP error status
    pub fn record_broken(&self, url: &str) {
        self.broken
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url);
    }

    /// Records a task that contributed nothing because of a failure
    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn links_found(&self) -> usize {
        self.links_found.load(Ordering::Relaxed)
    }

    pub fn pages_followed(&self) -> usize {
        self.pages_followed.load(Ordering::Relaxed)
    }

    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    /// Freezes the statistics into a result
    ///
    /// Each URL list is copied under its own lock. Call once all tasks have
    /// finished for counters and lists to agree.
    pub fn finish(&self, seed: &str, started_at: DateTime<Utc>, started: Instant) -> CrawlResult {
        let discovered_urls = self
            .discovered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .urls
            .clone();
        let followed_urls = self
            .followed
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        let broken_urls = self
            .broken
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .urls
            .clone();

        CrawlResult {
            seed: seed.to_string(),
            discovered_urls,
            followed_urls,
            broken_urls,
            links_found: self.links_found(),
            pages_followed: self.pages_followed(),
            errors: self.errors(),
            started_at,
            finished_at: Utc::now(),
            elapsed_secs: started.elapsed().as_secs_f64(),
        }
    }
}

/// Final, read-only outcome of a crawl
#[derive(Debug, Clone, Serialize)]
pub struct CrawlResult {
    /// The URL the crawl started from
    pub seed: String,

    /// Links found on followed pages, each at most once
    ///
    /// Sequential crawls list them in discovery order; concurrent crawls in
    /// completion order, which varies between runs.
    pub discovered_urls: Vec<String>,

    /// Pages followed after the seed, in the order they were dispatched
    pub followed_urls: Vec<String>,

    /// Pages whose fetch answered with an HTTP error status
    pub broken_urls: Vec<String>,

    pub links_found: usize,
    pub pages_followed: usize,

    /// Tasks abandoned because of a transport or unexpected failure
    pub errors: usize,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub elapsed_secs: f64,
}
