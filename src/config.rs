// src/config.rs
// =============================================================================
// Settings for one crawl run.
//
// The CLI (src/cli.rs) fills a CrawlConfig from flags; library users can build
// one directly and start from CrawlConfig::default().
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Default number of link hops from the start URL (the start URL is depth 1).
pub const DEFAULT_DEPTH_LIMIT: usize = 3;

/// Default number of fetches allowed in flight at once.
pub const DEFAULT_RATE_LIMIT: usize = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("depth limit must be at least 1")]
    ZeroDepth,
    #[error("rate limit must be at least 1")]
    ZeroRate,
    #[error("retry policy needs at least one attempt")]
    ZeroAttempts,
}

/// How many times a fetch is tried and how long to wait in between.
///
/// Only transient failures (connect errors, server disconnects) are retried;
/// see `FetchError::is_transient`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Fixed pause between two attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Pages deeper than this are never fetched
    pub depth_limit: usize,
    /// Size of the global fetch limiter
    pub rate_limit: usize,
    pub retry: RetryPolicy,
    /// Per-request timeout handed to the HTTP client
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
    /// Where the JSON result file is written
    pub output_dir: PathBuf,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            depth_limit: DEFAULT_DEPTH_LIMIT,
            rate_limit: DEFAULT_RATE_LIMIT,
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(30),
            user_agent: concat!("site-crawler/", env!("CARGO_PKG_VERSION")).to_string(),
            accept_invalid_certs: false,
            output_dir: PathBuf::from("."),
        }
    }
}

impl CrawlConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth_limit == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.rate_limit == 0 {
            return Err(ConfigError::ZeroRate);
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }
}
