// src/crawl/engine.rs
// =============================================================================
// The traversal engine: depth-bounded, concurrent, same-host crawling.
//
// How one branch runs (one branch = one URL plus everything found below it):
// 1. Skip if the URL is deeper than the depth limit or was already claimed
// 2. Fetch it (this is where the global concurrency limit applies)
// 3. Extract title / image / links and record the page
// 4. Spawn a child branch for every in-scope link at depth + 1
// 5. Wait for all children before reporting done
//
// Any number of branches can be alive at once; only `rate_limit` of them can
// be fetching. The fetch permit is released before step 4, so a parent never
// holds a slot its children are waiting for.
//
// A branch that fails (no page, panicked task) just ends. Its siblings and
// parent carry on.
// =============================================================================

use chrono::Local;
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, Instrument};
use url::Url;

use super::visited::VisitedSet;
use crate::config::{ConfigError, CrawlConfig};
use crate::extract::{extract, Scope};
use crate::fetch::{Fetcher, Transport};
use crate::output::{PageRecord, Record, ResultAccumulator, RunMetadata};

/// One unit of crawl work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    pub url: Url,
    /// Link hops from the start URL, which is depth 1
    pub depth: usize,
}

/// Numbers for the end-of-run log line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrawlSummary {
    /// Pages fetched and recorded
    pub pages: usize,
    /// URLs claimed for fetching, including ones that failed
    pub visited: usize,
    pub elapsed: Duration,
}

/// Everything a finished run hands back
#[derive(Debug)]
pub struct CrawlReport {
    /// The start URL, also the crawl scope
    pub host: Url,
    /// Run metadata first, then one entry per recorded page
    pub records: Vec<Record>,
    pub summary: CrawlSummary,
}

pub struct Crawler<T> {
    scope: Scope,
    depth_limit: usize,
    fetcher: Fetcher<T>,
    visited: VisitedSet,
    results: ResultAccumulator,
}

impl<T: Transport> Crawler<T> {
    /// Prepares a run. The run metadata is stamped now, before any fetching.
    pub fn new(start: Url, config: &CrawlConfig, transport: T) -> Result<Self, ConfigError> {
        let metadata = RunMetadata::new(start.as_str(), Local::now());
        Self::with_metadata(start, metadata, config, transport)
    }

    /// Like `new`, but with caller-built metadata, e.g. to keep the host
    /// exactly as the user typed it.
    pub fn with_metadata(
        start: Url,
        metadata: RunMetadata,
        config: &CrawlConfig,
        transport: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            scope: Scope::new(start),
            depth_limit: config.depth_limit,
            fetcher: Fetcher::new(transport, config.rate_limit, config.retry),
            visited: VisitedSet::new(),
            results: ResultAccumulator::new(metadata),
        })
    }

    /// Crawls from the start URL until no reachable, unvisited, in-scope
    /// link within the depth limit is left.
    pub async fn run(self) -> CrawlReport {
        let started = Instant::now();
        let host = self.scope.host().clone();
        let span = info_span!("crawl", host = %host);

        let crawler = Arc::new(self);
        let root = CrawlTarget {
            url: host.clone(),
            depth: 1,
        };
        Arc::clone(&crawler).visit(root).instrument(span.clone()).await;

        let summary = CrawlSummary {
            pages: crawler.results.page_count(),
            visited: crawler.visited.len(),
            elapsed: started.elapsed(),
        };
        span.in_scope(|| {
            info!(
                visited = summary.visited,
                "Crawled {} pages in {:.2} seconds",
                summary.pages,
                summary.elapsed.as_secs_f64()
            )
        });

        CrawlReport {
            host,
            records: crawler.results.finalize(),
            summary,
        }
    }

    // Boxed because the future recurses into itself through spawned children
    fn visit(self: Arc<Self>, target: CrawlTarget) -> BoxFuture<'static, ()> {
        async move {
            let CrawlTarget { url, depth } = target;

            if depth > self.depth_limit {
                debug!(%url, depth, "beyond depth limit, skipping");
                return;
            }
            if !self.visited.claim(&url) {
                debug!(%url, "already visited, skipping");
                return;
            }

            let Some(text) = self.fetcher.fetch(&url).await else {
                debug!(%url, "no content, branch ends");
                return;
            };

            // Parsing happens entirely between two awaits
            let page = extract(&self.scope, &url, &text);
            debug!(%url, depth, title = %page.title, links = page.links.len(), "parsed page");

            self.results.append(PageRecord {
                url: url.to_string(),
                title: page.title,
                image: page.image,
            });

            let mut children = JoinSet::new();
            for link in page.links {
                if !self.scope.is_valid(&link) {
                    debug!(%link, "out of scope, skipping");
                    continue;
                }
                let child = CrawlTarget {
                    url: link,
                    depth: depth + 1,
                };
                children.spawn(Arc::clone(&self).visit(child).in_current_span());
            }

            while let Some(joined) = children.join_next().await {
                if let Err(e) = joined {
                    error!(parent = %url, error = %e, "crawl branch failed");
                }
            }
        }
        .boxed()
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why `self: Arc<Self>`?
//    - Every spawned child task needs its own handle to the crawler
//    - Arc is a shared, reference-counted pointer; cloning it is cheap
//    - tokio::spawn requires 'static futures, so borrowing &self won't do
//
// 2. Why BoxFuture?
//    - visit() creates futures that contain calls to visit()
//    - An async fn can't contain itself (its size would be infinite)
//    - Boxing puts the future on the heap and gives it a fixed size
//
// 3. What is JoinSet?
//    - A group of spawned tasks we can wait on together
//    - join_next() yields each task's result as it finishes
//    - A panicking task shows up as Err(JoinError) instead of crashing us
//
// 4. What does in_current_span() do?
//    - Attaches the current tracing span ("crawl") to the child task
//    - Log lines from any branch then carry the host they belong to
// -----------------------------------------------------------------------------
