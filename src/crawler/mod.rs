//! Crawler module for web page fetching and traversal
//!
//! This module contains the crawl engine, including:
//! - HTTP fetching and anchor extraction
//! - The frontier work queue and its visited-set
//! - Thread-safe crawl statistics
//! - The sequential and the concurrent schedulers

mod concurrent;
mod fetcher;
mod frontier;
mod parser;
mod sequential;
mod stats;

pub use concurrent::{worker_count, ConcurrentScheduler};
pub use fetcher::{build_http_client, Fetcher, Page};
pub use frontier::{CrawlTask, Frontier, VisitedSet};
pub use parser::extract_links;
pub use sequential::SequentialScheduler;
pub use stats::{CrawlResult, CrawlStats};
