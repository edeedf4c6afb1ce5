//! URL handling module for Ripple-Crawl
//!
//! This module provides authority extraction, host matching, and the host
//! policy deciding which discovered pages may be followed.

mod domain;
mod matcher;

use crate::config::HostMatch;
use crate::{UrlError, UrlResult};
use url::Url;

// Re-export main functions
pub use domain::extract_authority;
pub use matcher::matches_host;

/// Host restriction of a crawl, derived once from the seed URL
///
/// Immutable for the lifetime of a crawl; shared freely between workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostScope {
    required_host: String,
    locked: bool,
    rule: HostMatch,
}

impl HostScope {
    /// Derives the scope from the seed URL
    ///
    /// # Returns
    ///
    /// * `Ok(HostScope)` - The seed's authority becomes the required host
    /// * `Err(UrlError)` - The seed has no host
    pub fn from_seed(seed: &Url, locked: bool, rule: HostMatch) -> UrlResult<Self> {
        let required_host =
            extract_authority(seed).ok_or_else(|| UrlError::MissingHost(seed.to_string()))?;

        Ok(Self {
            required_host,
            locked,
            rule,
        })
    }

    pub fn required_host(&self) -> &str {
        &self.required_host
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Decides whether a discovered URL is eligible to be followed
    ///
    /// Unlocked scopes accept everything. Locked scopes accept URLs whose
    /// authority matches the required host under the configured rule; URLs
    /// without a host never match.
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use ripple_crawl::config::HostMatch;
    /// use ripple_crawl::url::HostScope;
    ///
    /// let seed = Url::parse("https://example.com/").unwrap();
    /// let scope = HostScope::from_seed(&seed, true, HostMatch::Subdomain).unwrap();
    ///
    /// assert!(scope.is_in_scope(&Url::parse("https://docs.example.com/a").unwrap()));
    /// assert!(!scope.is_in_scope(&Url::parse("https://other.org/").unwrap()));
    /// ```
    pub fn is_in_scope(&self, url: &Url) -> bool {
        if !self.locked {
            return true;
        }

        match extract_authority(url) {
            Some(candidate) => matches_host(self.rule, &self.required_host, &candidate),
            None => false,
        }
    }
}
