//! Ripple-Crawl: a bounded-depth web crawler
//!
//! This crate discovers and follows hyperlinks from a seed URL up to a maximum
//! traversal bound, optionally locked to the seed's host, and reports the set of
//! discovered URLs together with visit/follow statistics.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Main error type for Ripple-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure of a single page fetch that produced no usable HTTP response
///
/// Responses carrying an HTTP error status are not errors: they come back as a
/// broken [`crawler::Page`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Failed to read body of {url}: {source}")]
    Body { url: String, source: reqwest::Error },
}

impl FetchError {
    /// The URL whose fetch failed
    pub fn url(&self) -> &str {
        match self {
            Self::InvalidUrl { url, .. } | Self::Transport { url, .. } | Self::Body { url, .. } => {
                url
            }
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL '{url}': {source}")]
    Parse {
        url: String,
        source: ::url::ParseError,
    },

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// Result type alias for Ripple-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Browser, CrawlConfig, FrontierOrder, HostMatch};
pub use crawler::{CrawlResult, CrawlTask, Fetcher, Page};
pub use crate::url::HostScope;

/// Crawls from `seed_url` according to `config`
///
/// Dispatches to the sequential or the concurrent scheduler depending on
/// `config.concurrent`. Per-page failures never abort the crawl; only an
/// invalid configuration, an invalid seed URL or a seed fetch without any
/// HTTP response is reported as an error.
///
/// # Example
///
/// ```no_run
/// use ripple_crawl::{crawl, CrawlConfig};
///
/// # async fn example() -> ripple_crawl::Result<()> {
/// let config = CrawlConfig {
///     max_depth: 5,
///     ..CrawlConfig::default()
/// };
/// let result = crawl("https://example.com/", &config).await?;
/// println!("{} links found", result.links_found);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(seed_url: &str, config: &CrawlConfig) -> Result<CrawlResult> {
    crawl_with_cancellation(seed_url, config, CancellationToken::new()).await
}

/// Same as [`crawl`], but stops dispatching new fetches once `cancel` fires
///
/// Statistics gathered up to the cancellation point are returned.
pub async fn crawl_with_cancellation(
    seed_url: &str,
    config: &CrawlConfig,
    cancel: CancellationToken,
) -> Result<CrawlResult> {
    config::validate(config)?;

    if config.concurrent {
        crawler::ConcurrentScheduler::new(config)?
            .run(seed_url, cancel)
            .await
    } else {
        crawler::SequentialScheduler::new(config)?
            .run(seed_url, cancel)
            .await
    }
}

/// Lists the links of a single page without traversing them
///
/// Returns `(index, url)` pairs in document order. A page answering with an
/// HTTP error status yields an empty list.
pub async fn fetch_links(url: &str, user_agent: &str) -> Result<Vec<(usize, String)>> {
    let fetcher = Fetcher::with_user_agent(user_agent)?;
    let page = fetcher.fetch(url).await?;

    Ok(page.links.into_iter().enumerate().collect())
}
