// src/output/export.rs
// =============================================================================
// Writes the finished result set to disk.
//
// File name: <host netloc with '.' -> '_'>_<YYYYMMDD_HHMMSS>.json
//   e.g. http://example.com:8080/ at 2024-03-09 07:05:01
//        -> example_com:8080_20240309_070501.json
//
// The JSON is indented with four spaces and non-ASCII text is written as-is
// (serde_json never escapes it).
// =============================================================================

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use super::records::Record;
use crate::extract::netloc;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub fn file_name(host: &Url, stamp: DateTime<Local>) -> String {
    format!(
        "{}_{}.json",
        netloc(host).replace('.', "_"),
        stamp.format("%Y%m%d_%H%M%S")
    )
}

/// Serializes records as 4-space indented JSON
pub fn to_json(records: &[Record]) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    records.serialize(&mut serializer)?;

    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Writes `records` into `dir` and returns the path of the new file.
/// The file name is stamped with the current local time.
pub fn write_results(dir: &Path, host: &Url, records: &[Record]) -> Result<PathBuf, ExportError> {
    let path = dir.join(file_name(host, Local::now()));
    let json = to_json(records)?;

    std::fs::write(&path, json).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}
