//! Ripple-Crawl main entry point
//!
//! This is the command-line interface for the Ripple-Crawl web crawler.

use anyhow::Context;
use clap::Parser;
use ripple_crawl::config::{load_config, validate, Browser, CrawlConfig};
use ripple_crawl::output::{print_links, print_report, to_json};
use ripple_crawl::{crawl_with_cancellation, fetch_links};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Ripple-Crawl: a bounded-depth web crawler
///
/// Starts from a target URL, fetches the page, collects all of its links and
/// keeps following them until the frontier is exhausted or the depth bound
/// is reached.
#[derive(Parser, Debug)]
#[command(name = "ripple-crawl")]
#[command(version)]
#[command(about = "A bounded-depth web crawler", long_about = None)]
struct Cli {
    /// Target URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum depth to traverse (<= 0 means unbounded) [default: 30]
    #[arg(short, long, allow_negative_numbers = true)]
    depth: Option<i64>,

    /// Only list the links of the target URL, without crawling
    #[arg(short, long)]
    links: bool,

    /// Browser whose User-Agent is sent
    #[arg(short, long, value_enum)]
    browser: Option<Browser>,

    /// Explicit User-Agent string (overrides --browser)
    #[arg(long)]
    user_agent: Option<String>,

    /// Follow pages on any host, not only the target's
    #[arg(long)]
    unlocked: bool,

    /// Fetch pages in parallel
    #[arg(short, long)]
    concurrent: bool,

    /// Maximum number of parallel fetches (implies --concurrent)
    #[arg(short, long, value_name = "N")]
    workers: Option<usize>,

    /// Path to a TOML file with crawl settings; flags take precedence
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;

    if cli.links {
        let links = fetch_links(&cli.url, config.user_agent_string())
            .await
            .with_context(|| format!("Failed to fetch links of {}", cli.url))?;
        print_links(&links);
        return Ok(());
    }

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    if !cli.json {
        println!("CRAWLER STARTED:");
        println!(
            "{}, will crawl upto depth {}",
            cli.url,
            config.depth_limit().map_or("unbounded".to_string(), |d| d.to_string())
        );
    }

    let result = crawl_with_cancellation(&cli.url, &config, cancel)
        .await
        .with_context(|| format!("Crawl of {} failed", cli.url))?;

    if cli.json {
        println!("{}", to_json(&result)?);
    } else {
        print_report(&result);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_crawl=info,warn"),
            1 => EnvFilter::new("ripple_crawl=debug,info"),
            2 => EnvFilter::new("ripple_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Merges the optional config file with command-line flags
fn build_config(cli: &Cli) -> anyhow::Result<CrawlConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => CrawlConfig::default(),
    };

    if let Some(depth) = cli.depth {
        config.max_depth = depth;
    }
    if let Some(browser) = cli.browser {
        config.browser = browser;
    }
    if let Some(agent) = &cli.user_agent {
        config.user_agent = Some(agent.clone());
    }
    if cli.unlocked {
        config.locked = false;
    }
    if cli.concurrent || cli.workers.is_some() {
        config.concurrent = true;
    }
    if cli.workers.is_some() {
        config.max_workers = cli.workers;
    }

    validate(&config)?;
    Ok(config)
}

/// Cancels the crawl on Ctrl-C so partial statistics still get printed
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing with the results gathered so far");
            cancel.cancel();
        }
    });
}
