// src/lib.rs
// =============================================================================
// site-crawler: a bounded-depth, single-host web crawler.
//
// Given a start URL it fetches every same-host page reachable within a depth
// limit, records each page's title and representative image, and writes the
// records out as JSON.
//
// Modules:
// - config: CrawlConfig and RetryPolicy
// - fetch: HTTP transport, charset decoding, limiter + retry
// - extract: HTML queries, page extraction, crawl scope
// - crawl: visited set and the concurrent traversal engine
// - output: result records and JSON export
// =============================================================================

pub mod config;
pub mod crawl;
pub mod extract;
pub mod fetch;
pub mod output;

pub use config::{CrawlConfig, RetryPolicy};
pub use crawl::{crawl_website, CrawlError, CrawlReport, Crawler};
pub use output::{write_results, PageRecord, Record, RunMetadata};
