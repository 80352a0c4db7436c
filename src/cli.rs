// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
// =============================================================================

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use site_crawler::config::{CrawlConfig, DEFAULT_DEPTH_LIMIT, DEFAULT_RATE_LIMIT};

#[derive(Parser, Debug)]
#[command(
    name = "site-crawler",
    version,
    about = "Crawl one website and record each page's title and representative image",
    long_about = "site-crawler follows same-host links from a start URL up to a depth limit, \
                  fetching a bounded number of pages at once, and writes every page's URL, \
                  title and representative image to a JSON file."
)]
pub struct Cli {
    /// The host URL to crawl (e.g., https://example.com)
    pub host: String,

    /// Maximum crawl depth
    ///
    /// Depth 1 = just the starting page
    /// Depth 2 = starting page + all pages it links to
    /// etc.
    #[arg(long, default_value_t = DEFAULT_DEPTH_LIMIT)]
    pub depth: usize,

    /// Maximum number of pages fetched at the same time
    #[arg(long, default_value_t = DEFAULT_RATE_LIMIT)]
    pub rate: usize,

    /// Directory the JSON result file is written to
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Don't verify TLS certificates
    #[arg(long)]
    pub insecure: bool,

    /// Show debug logs (RUST_LOG overrides this)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            depth_limit: self.depth,
            rate_limit: self.rate,
            request_timeout: Duration::from_secs(self.timeout),
            accept_invalid_certs: self.insecure,
            output_dir: self.output_dir.clone(),
            ..CrawlConfig::default()
        }
    }
}
