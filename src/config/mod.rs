//! Configuration module for Ripple-Crawl
//!
//! A crawl is driven entirely by a [`CrawlConfig`] value. The library never reads
//! files by itself; [`load_config`] is offered to callers that want to keep their
//! crawl settings in a TOML file.
//!
//! # Example
//!
//! ```no_run
//! use ripple_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.max_depth);
//! ```

mod parser;
mod types;
mod user_agent;
mod validation;

// Re-export types
pub use types::{CrawlConfig, FrontierOrder, HostMatch, DEFAULT_MAX_DEPTH};
pub use user_agent::Browser;

// Re-export parser and validation functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, MAX_WORKERS_CEILING};
