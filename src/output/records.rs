// src/output/records.rs
// =============================================================================
// What a crawl run produces: one PageRecord per fetched page plus one
// RunMetadata entry describing the run itself.
//
// The accumulator is shared by every crawl branch. Page order depends on
// which fetch finishes first and is not stable between runs; the metadata
// entry is always first because it is inserted before crawling starts.
// =============================================================================

use chrono::{DateTime, Local};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageRecord {
    pub url: String,
    pub title: String,
    /// Serialized as null when the page has no representative image
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunMetadata {
    pub host: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM:SS
    pub time: String,
}

impl RunMetadata {
    pub fn new(host: &str, started: DateTime<Local>) -> Self {
        Self {
            host: host.to_string(),
            date: started.format("%Y-%m-%d").to_string(),
            time: started.format("%H:%M:%S").to_string(),
        }
    }
}

/// One entry of the result file
///
/// Untagged, so entries serialize as plain objects:
/// `{"url", "title", "image"}` or `{"host", "date", "time"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Record {
    Run(RunMetadata),
    Page(PageRecord),
}

/// Append-only, thread-safe list of records for one run
pub struct ResultAccumulator {
    records: Mutex<Vec<Record>>,
}

impl ResultAccumulator {
    pub fn new(metadata: RunMetadata) -> Self {
        Self {
            records: Mutex::new(vec![Record::Run(metadata)]),
        }
    }

    pub fn append(&self, page: PageRecord) {
        self.lock().push(Record::Page(page));
    }

    pub fn page_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|r| matches!(r, Record::Page(_)))
            .count()
    }

    /// Takes the collected records. Call once all crawl branches have joined.
    pub fn finalize(&self) -> Vec<Record> {
        std::mem::take(&mut *self.lock())
    }

    // A panic in another branch while holding the lock cannot leave a
    // half-pushed Vec behind, so a poisoned lock is still usable
    fn lock(&self) -> MutexGuard<'_, Vec<Record>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
