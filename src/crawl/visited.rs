// src/crawl/visited.rs
// =============================================================================
// The set of URLs already claimed for fetching in this run.
//
// Many crawl branches run at once and several pages can link to the same URL,
// so "is it visited?" and "mark it visited" must be one step. claim() does
// both under a single lock: exactly one caller wins for each URL.
// =============================================================================

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use url::Url;

#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `url` and returns true if nobody claimed it before
    pub fn claim(&self, url: &Url) -> bool {
        self.urls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.as_str().to_owned())
    }

    pub fn len(&self) -> usize {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
