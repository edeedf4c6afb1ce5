use crate::config::Browser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default traversal bound used when none is configured
pub const DEFAULT_MAX_DEPTH: i64 = 30;

/// All parameters of a single crawl
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Traversal bound; `<= 0` means unbounded
    ///
    /// The sequential scheduler counts dequeued tasks against it, the
    /// concurrent scheduler compares it with each task's link depth.
    #[serde(rename = "max-depth")]
    pub max_depth: i64,

    /// Only follow pages whose host matches the seed's host
    pub locked: bool,

    /// Browser identity whose user-agent string is sent
    pub browser: Browser,

    /// Explicit user-agent string, takes precedence over `browser`
    #[serde(rename = "user-agent")]
    pub user_agent: Option<String>,

    /// Use the worker-pool scheduler instead of the sequential loop
    pub concurrent: bool,

    /// Upper bound on parallel fetches; sized automatically when unset
    #[serde(rename = "max-workers")]
    pub max_workers: Option<usize>,

    /// Whole-request timeout for one fetch (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,

    /// Connection establishment timeout (milliseconds)
    #[serde(rename = "connect-timeout-ms")]
    pub connect_timeout_ms: u64,

    /// Host comparison rule applied when `locked` is set
    #[serde(rename = "host-match")]
    pub host_match: HostMatch,

    /// Dequeue order of the sequential frontier
    #[serde(rename = "frontier-order")]
    pub frontier_order: FrontierOrder,

    /// HTML-escape raw hrefs before resolving them (historical behaviour)
    #[serde(rename = "escape-hrefs")]
    pub escape_hrefs: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            locked: true,
            browser: Browser::default(),
            user_agent: None,
            concurrent: false,
            max_workers: None,
            request_timeout_ms: 30_000,
            connect_timeout_ms: 10_000,
            host_match: HostMatch::default(),
            frontier_order: FrontierOrder::default(),
            escape_hrefs: false,
        }
    }
}

impl CrawlConfig {
    /// The user-agent string sent with every request
    pub fn user_agent_string(&self) -> &str {
        self.user_agent
            .as_deref()
            .unwrap_or_else(|| self.browser.user_agent())
    }

    /// The traversal bound, or `None` when the crawl is unbounded
    pub fn depth_limit(&self) -> Option<usize> {
        usize::try_from(self.max_depth).ok().filter(|d| *d > 0)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// How a candidate host is compared with the seed's host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostMatch {
    /// Exact host, or any subdomain of it
    #[default]
    Subdomain,
    /// Any host containing the seed's host as a substring
    ///
    /// Matches `evil-example.com` for `example.com`; kept only for
    /// reproducing historical crawls.
    Contains,
}

/// Dequeue order of the frontier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FrontierOrder {
    /// Breadth-first: oldest task first
    #[default]
    Fifo,
    /// Depth-first: newest task first
    Lifo,
}
