// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Concurrent crawling starting from a URL, one task per page
// - Same-host restriction (doesn't crawl external sites)
// - Configurable depth limit
// - Global cap on fetches in flight, retries for flaky connections
//
// crawl_website() is the one-call entry point used by the CLI. Crawler can be
// driven directly with any Transport (tests use an in-memory one).
// =============================================================================

mod engine;
mod visited;

pub use engine::{CrawlReport, CrawlSummary, CrawlTarget, Crawler};
pub use visited::VisitedSet;

use chrono::Local;
use thiserror::Error;
use url::Url;

use crate::config::{ConfigError, CrawlConfig};
use crate::fetch::HttpTransport;
use crate::output::RunMetadata;

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported scheme '{0}', expected http or https")]
    UnsupportedScheme(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to create HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Parses and normalizes the start URL
///
/// The fragment is dropped, so `http://example.com/#top` crawls
/// `http://example.com/`.
pub fn parse_start_url(start_url: &str) -> Result<Url, CrawlError> {
    let mut url = Url::parse(start_url).map_err(|source| CrawlError::InvalidUrl {
        url: start_url.to_string(),
        source,
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(CrawlError::UnsupportedScheme(url.scheme().to_string()));
    }

    url.set_fragment(None);
    Ok(url)
}

/// Crawls a website over HTTP starting from `start_url`
///
/// The metadata record carries `start_url` as given; pages and the crawl
/// scope use the parsed form.
pub async fn crawl_website(start_url: &str, config: &CrawlConfig) -> Result<CrawlReport, CrawlError> {
    config.validate()?;
    let start = parse_start_url(start_url)?;
    let transport = HttpTransport::new(config)?;
    let metadata = RunMetadata::new(start_url, Local::now());

    Ok(Crawler::with_metadata(start, metadata, config, transport)?
        .run()
        .await)
}
