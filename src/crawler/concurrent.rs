//! Concurrent crawl scheduler
//!
//! This module handles:
//! - Sizing the worker pool for an I/O-bound workload
//! - Admitting discovered links (depth bound, host policy, de-duplication)
//! - Dispatching fetches while capping in-flight tasks at twice the workers
//! - Reaping completed fetches as they finish, without polling
//!
//! Unlike the sequential scheduler, the bound applies to each task's link
//! depth: a link found on a page at depth `d` gets depth `d + 1` and is
//! dropped before dispatch when that exceeds `max_depth`.

use crate::config::{CrawlConfig, MAX_WORKERS_CEILING};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::frontier::{CrawlTask, Frontier};
use crate::crawler::stats::{CrawlResult, CrawlStats};
use crate::url::HostScope;
use crate::{CrawlError, UrlError};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Worker ceiling applied by the automatic sizing heuristic
const IO_BOUND_CEILING: usize = 64;

/// Workers allowed per CPU for network-bound fetching
const WORKERS_PER_CPU: usize = 4;

/// Chooses the number of parallel fetches for a crawl
///
/// An explicit request is honoured up to [`MAX_WORKERS_CEILING`]. Otherwise
/// the pool is sized as `min(tasks, cpus × 4, 64)`, since fetches spend most
/// of their time waiting on the network. Never returns 0.
pub fn worker_count(requested: Option<usize>, task_estimate: usize) -> usize {
    match requested {
        Some(n) => n.clamp(1, MAX_WORKERS_CEILING),
        None => {
            let cpus = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4);
            task_estimate
                .min(cpus * WORKERS_PER_CPU)
                .min(IO_BOUND_CEILING)
                .max(1)
        }
    }
}

/// Outcome of one worker task, handed back to the dispatcher
struct Visit {
    task: CrawlTask,
    new_links: Vec<String>,
}

/// Worker-pool crawl scheduler
pub struct ConcurrentScheduler {
    config: CrawlConfig,
    fetcher: Fetcher,
}

impl ConcurrentScheduler {
    /// Creates a scheduler and its shared HTTP client
    pub fn new(config: &CrawlConfig) -> Result<Self, CrawlError> {
        Ok(Self {
            config: config.clone(),
            fetcher: Fetcher::new(config)?,
        })
    }

    /// Runs the crawl from `seed_url`
    ///
    /// The seed is fetched first; its link count feeds the worker sizing.
    /// From then on the dispatcher keeps up to `2 × workers` fetches in
    /// flight, and wakes whenever one completes or the crawl is cancelled.
    /// On cancellation in-flight fetches are aborted and the statistics
    /// gathered so far are returned.
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
        let stats = Arc::new(CrawlStats::new());
        let mut frontier = Frontier::new(self.config.frontier_order);
        frontier.mark_visited(seed.as_str());

        let page = self.fetcher.fetch(seed_url).await?;
        if page.broken {
            tracing::warn!("Seed {} is broken: {:?}", seed, page.error);
            stats.record_broken(seed.as_str());
        }
        for link in page.links {
            self.admit(&mut frontier, &scope, link, 1);
        }

        let workers = worker_count(self.config.max_workers, frontier.len());
        let in_flight_limit = workers * 2;
        let permits = Arc::new(Semaphore::new(workers));
        let mut in_flight: JoinSet<Visit> = JoinSet::new();

        tracing::info!(
            "Starting concurrent crawl of {} with {} workers (host: {}, locked: {}, max depth: {:?})",
            seed_url,
            workers,
            scope.required_host(),
            scope.is_locked(),
            self.config.depth_limit()
        );

        loop {
            while in_flight.len() < in_flight_limit {
                let Some(task) = frontier.dequeue() else {
                    break;
                };
                self.dispatch(&mut in_flight, &permits, &stats, task);
            }

            if in_flight.is_empty() {
                tracing::info!("Frontier is empty and no fetch is in flight, crawl complete");
                break;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(
                        "Crawl cancelled: aborting {} in-flight fetches, {} tasks queued",
                        in_flight.len(),
                        frontier.len()
                    );
                    in_flight.shutdown().await;
                    break;
                }
                Some(joined) = in_flight.join_next() => match joined {
                    Ok(visit) => {
                        for link in visit.new_links {
                            self.admit(&mut frontier, &scope, link, visit.task.depth + 1);
                        }
                    }
                    Err(e) => {
                        tracing::error!("Crawl task failed: {}", e);
                        stats.record_error();
                    }
                },
            }
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

    /// Queues a discovered link if it may be given to a worker
    ///
    /// A link is dropped when its depth exceeds the bound, when it is out of
    /// scope, or when it was queued before. Returns whether it was queued.
    fn admit(&self, frontier: &mut Frontier, scope: &HostScope, link: String, depth: usize) -> bool {
        if self.config.depth_limit().is_some_and(|limit| depth > limit) {
            tracing::trace!("Beyond depth bound: {} (depth {})", link, depth);
            return false;
        }

        match Url::parse(&link) {
            Ok(url) if scope.is_in_scope(&url) => frontier.try_enqueue(link, depth),
            Ok(_) => {
                tracing::trace!("Out of scope: {}", link);
                false
            }
            Err(e) => {
                tracing::debug!("Dropping malformed link {}: {}", link, e);
                false
            }
        }
    }

    /// Spawns the fetch of `task`; it waits for a worker permit first
    fn dispatch(
        &self,
        in_flight: &mut JoinSet<Visit>,
        permits: &Arc<Semaphore>,
        stats: &Arc<CrawlStats>,
        task: CrawlTask,
    ) {
        let fetcher = self.fetcher.clone();
        let permits = Arc::clone(permits);
        let stats = Arc::clone(stats);

        in_flight.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                return Visit {
                    task,
                    new_links: Vec::new(),
                };
            };

            let new_links = visit(&fetcher, &stats, &task).await;
            Visit { task, new_links }
        });
    }
}

/// Fetches one page and records its outcome
///
/// Returns every link on the page. Whether a link is queued is decided by
/// [`ConcurrentScheduler::admit`]: a link dropped for depth on one page may
/// still be admitted from a shallower page that completes later.
async fn visit(fetcher: &Fetcher, stats: &CrawlStats, task: &CrawlTask) -> Vec<String> {
    stats.record_followed(&task.url);
    tracing::debug!("Following {} (depth {})", task.url, task.depth);

    match fetcher.fetch(&task.url).await {
        Ok(page) if page.broken => {
            tracing::warn!("Broken URL {} -> {:?}", task.url, page.error);
            stats.record_broken(&task.url);
            Vec::new()
        }
        Ok(page) => {
            for link in &page.links {
                stats.record_link(link);
            }
            page.links
        }
        Err(e) => {
            tracing::warn!("The URL {} can't be crawled: {}", task.url, e);
            stats.record_error();
            Vec::new()
        }
    }
}
