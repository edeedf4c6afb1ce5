//! Sequential crawl scheduler
//!
//! Single-task control loop: fetch the seed, then drain the frontier one task
//! at a time until it is empty, the task budget is spent, or the crawl is
//! cancelled.
//!
//! The traversal bound counts dequeued tasks: after the `n`-th dequeue the
//! loop stops when `n > max_depth` (and `max_depth > 0`).

use crate::config::CrawlConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{CrawlTask, Frontier};
use crate::crawler::stats::{CrawlResult, CrawlStats};
use crate::url::HostScope;
use crate::{CrawlError, UrlError};
use chrono::Utc;
use std::collections::HashSet;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Lifecycle of a sequential crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Seeding,
    Draining,
    Done,
}

/// Single-task crawl scheduler
pub struct SequentialScheduler {
    config: CrawlConfig,
    fetcher: Fetcher,
}

impl SequentialScheduler {
    /// Creates a scheduler and its HTTP client
    ///
    /// # Returns
    ///
    /// * `Ok(SequentialScheduler)` - Ready to run
    /// * `Err(CrawlError)` - The HTTP client could not be built
    pub fn new(config: &CrawlConfig) -> Result<Self, CrawlError> {
        Ok(Self {
            config: config.clone(),
            fetcher: Fetcher::new(config)?,
        })
    }

    /// Runs the crawl from `seed_url`
    ///
    /// This method:
    /// 1. Fetches the seed and queues every link on it at depth 1
    /// 2. Dequeues tasks, skipping pages already followed
    /// 3. Follows in-scope pages and queues their new links at depth + 1
    /// 4. Stops on an empty frontier, a spent task budget, or cancellation
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlResult)` - Final statistics
    /// * `Err(CrawlError)` - The seed URL is invalid or its fetch got no response
    pub async fn run(
        &self,
        seed_url: &str,
        cancel: CancellationToken,
    ) -> Result<CrawlResult, CrawlError> {
        let seed = Url::parse(seed_url).map_err(|source| UrlError::Parse {
            url: seed_url.to_string(),
            source,
        })?;
        let scope = HostScope::from_seed(&seed, self.config.locked, self.config.host_match)?;

        let started_at = Utc::now();
        let started = Instant::now();
        let stats = CrawlStats::new();
        let mut frontier = Frontier::new(self.config.frontier_order);
        // Links are compared in their parsed form, so the seed is too
        let mut followed: HashSet<String> = HashSet::from([seed.to_string()]);
        let depth_limit = self.config.depth_limit();
        let mut dequeued = 0usize;
        let mut phase = Phase::Seeding;

        tracing::info!(
            "Starting sequential crawl of {} (host: {}, locked: {}, bound: {:?})",
            seed_url,
            scope.required_host(),
            scope.is_locked(),
            depth_limit
        );

        while phase != Phase::Done {
            phase = match phase {
                Phase::Seeding => {
                    let page = self.fetcher.fetch(seed_url).await?;
                    if page.broken {
                        tracing::warn!("Seed {} is broken: {:?}", seed, page.error);
                        stats.record_broken(seed.as_str());
                    }

                    // Seed links bypass the host policy here; it is applied on dequeue
                    for link in page.links {
                        frontier.try_enqueue(link, 1);
                    }
                    tracing::debug!("Seeded frontier with {} tasks", frontier.len());

                    Phase::Draining
                }

                Phase::Draining => {
                    if cancel.is_cancelled() {
                        tracing::info!("Crawl cancelled with {} tasks queued", frontier.len());
                        break;
                    }

                    let Some(task) = frontier.dequeue() else {
                        tracing::info!("Frontier is empty, crawl complete");
                        break;
                    };
                    dequeued += 1;

                    if followed.contains(&task.url) {
                        tracing::trace!("Already followed {}", task.url);
                    } else {
                        let visited = tokio::select! {
                            biased;
                            _ = cancel.cancelled() => {
                                tracing::info!("Crawl cancelled while fetching {}", task.url);
                                break;
                            }
                            visited = self.visit(&task, &scope, &stats, &mut frontier) => visited,
                        };
                        if visited {
                            followed.insert(task.url);
                        }
                    }

                    match depth_limit {
                        Some(limit) if dequeued > limit => {
                            tracing::info!("Task budget of {} spent", limit);
                            Phase::Done
                        }
                        _ => Phase::Draining,
                    }
                }

                Phase::Done => Phase::Done,
            };
        }

        let result = stats.finish(seed_url, started_at, started);
        tracing::info!(
            "Crawl finished: {} links found, {} pages followed, {} broken, {} errors in {:.2}s",
            result.links_found,
            result.pages_followed,
            result.broken_urls.len(),
            result.errors,
            result.elapsed_secs
        );

        Ok(result)
    }

    /// Processes one dequeued task
    ///
    /// Returns `false` when the task was not followed (out of scope or
    /// malformed). Failures are logged and counted, never propagated.
    async fn visit(
        &self,
        task: &CrawlTask,
        scope: &HostScope,
        stats: &CrawlStats,
        frontier: &mut Frontier,
    ) -> bool {
        let url = match Url::parse(&task.url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("The URL {} can't be crawled: {}", task.url, e);
                stats.record_error();
                return false;
            }
        };

        if !scope.is_in_scope(&url) {
            tracing::debug!("Out of scope: {}", task.url);
            return false;
        }

        stats.record_followed(&task.url);
        tracing::debug!("Following {} (depth {})", task.url, task.depth);

        match self.fetcher.fetch(&task.url).await {
            Ok(page) if page.broken => {
                tracing::warn!("Broken URL {} -> {:?}", task.url, page.error);
                stats.record_broken(&task.url);
            }
            Ok(page) => {
                for link in page.links {
                    if stats.record_link(&link) {
                        frontier.try_enqueue(link, task.depth + 1);
                    }
                }
            }
            Err(e) => {
                tracing::warn!("The URL {} can't be crawled: {}", task.url, e);
                stats.record_error();
            }
        }

        true
    }
}
