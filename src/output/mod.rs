//! Output module for rendering crawl results
//!
//! This module handles:
//! - The human-readable crawl report (discovered URLs + statistics)
//! - The links-only listing of a single page
//! - JSON export of a crawl result

pub mod stats;

pub use stats::{format_report, print_report, Report};

use crate::crawler::CrawlResult;

/// Formats `(index, url)` pairs as `index ==> url` lines
pub fn format_links(links: &[(usize, String)]) -> String {
    links
        .iter()
        .map(|(i, url)| format!("{} ==> {}\n", i, url))
        .collect()
}

/// Prints the links-only listing to stdout
pub fn print_links(links: &[(usize, String)]) {
    print!("{}", format_links(links));
}

/// Serialises a crawl result as pretty-printed JSON
pub fn to_json(result: &CrawlResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}
