//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests to fetch page content
//! - Lossy UTF-8 decoding and anchor extraction
//! - Error classification (broken page vs. transport failure)

use crate::config::CrawlConfig;
use crate::crawler::parser::extract_links;
use crate::FetchError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Result of one page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// The URL that was requested
    pub source_url: String,

    /// Absolute anchor URLs, in document order, without in-page repeats
    pub links: Vec<String>,

    /// The server answered with an HTTP error status
    pub broken: bool,

    /// HTTP status code of the final response
    pub status: u16,

    /// Description of the HTTP error for broken pages
    pub error: Option<String>,
}

impl Page {
    fn broken(source_url: &str, status: reqwest::StatusCode) -> Self {
        Self {
            source_url: source_url.to_string(),
            links: Vec::new(),
            broken: true,
            status: status.as_u16(),
            error: Some(format!("HTTP {}", status)),
        }
    }
}

/// Builds an HTTP client with the given identity and timeouts
///
/// # Arguments
///
/// * `user_agent` - Value of the `User-Agent` header
/// * `request_timeout` - Upper bound on a whole request, body included
/// * `connect_timeout` - Upper bound on connection establishment
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    user_agent: &str,
    request_timeout: Duration,
    connect_timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Stateless page fetcher shared by all tasks of a crawl
///
/// Cloning is cheap: the underlying connection pool is reference counted.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    escape_hrefs: bool,
}

impl Fetcher {
    /// Creates a fetcher from the crawl configuration
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            config.user_agent_string(),
            config.request_timeout(),
            config.connect_timeout(),
        )?;

        Ok(Self {
            client,
            escape_hrefs: config.escape_hrefs,
        })
    }

    /// Creates a fetcher with default settings and the given user agent
    pub fn with_user_agent(user_agent: &str) -> Result<Self, reqwest::Error> {
        let config = CrawlConfig {
            user_agent: Some(user_agent.to_string()),
            ..CrawlConfig::default()
        };
        Self::new(&config)
    }

    /// Fetches a URL and extracts its links
    ///
    /// # Outcomes
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | 2xx / 3xx final response | `Ok(Page)` with links |
    /// | 4xx / 5xx final response | `Ok(Page)` with `broken = true`, no links |
    /// | Unparseable URL | `Err(FetchError::InvalidUrl)` |
    /// | DNS, connect, TLS, timeout, unsupported scheme | `Err(FetchError::Transport)` |
    /// | Body interrupted | `Err(FetchError::Body)` |
    ///
    /// The body is parsed as HTML whatever its declared content type, and
    /// invalid UTF-8 sequences are replaced rather than rejected. Links are
    /// resolved against the final URL after redirects.
    pub async fn fetch(&self, url: &str) -> Result<Page, FetchError> {
        let parsed = Url::parse(url).map_err(|source| FetchError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Ok(Page::broken(url, status));
        }

        let final_url = response.url().clone();
        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Body {
                url: url.to_string(),
                source,
            })?;

        let html = String::from_utf8_lossy(&body);
        let links = extract_links(&html, &final_url, self.escape_hrefs);

        tracing::debug!("Fetched {} ({}): {} links", url, status.as_u16(), links.len());

        Ok(Page {
            source_url: url.to_string(),
            links,
            broken: false,
            status: status.as_u16(),
            error: None,
        })
    }
}
