//! Human-readable crawl report
//!
//! The report lists every discovered URL, then a statistics block.

use crate::crawler::CrawlResult;
use std::fmt;

const RULE_WIDTH: usize = 100;

/// Display adapter rendering a [`CrawlResult`] as the crawl report
pub struct Report<'a>(pub &'a CrawlResult);

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let rule = "=".repeat(RULE_WIDTH);
        let stars = "*".repeat(RULE_WIDTH);

        for url in &result.discovered_urls {
            writeln!(f, "{}", url)?;
        }

        writeln!(f, "{}", rule)?;
        writeln!(f, "Crawler Statistics")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "No of links Found: {}", result.links_found)?;
        writeln!(f, "No of followed:     {}", result.pages_followed)?;

        if !result.broken_urls.is_empty() {
            writeln!(f, "No of broken:       {}", result.broken_urls.len())?;
            for url in &result.broken_urls {
                writeln!(f, "  - {}", url)?;
            }
        }

        if result.errors > 0 {
            writeln!(f, "No of errors:       {}", result.errors)?;
        }

        writeln!(f, "{}", stars)?;
        writeln!(f, "Execution took: {:.3}s", result.elapsed_secs)?;
        writeln!(f, "{}", stars)
    }
}

/// Formats the crawl report
pub fn format_report(result: &CrawlResult) -> String {
    Report(result).to_string()
}

/// Prints the crawl report to stdout
pub fn print_report(result: &CrawlResult) {
    print!("{}", Report(result));
}
