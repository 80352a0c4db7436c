// src/output/mod.rs
// =============================================================================
// The result set of a crawl run and how it reaches disk.
//
// Submodules:
// - records: PageRecord, RunMetadata and the shared ResultAccumulator
// - export: file naming and pretty JSON output
// =============================================================================

mod export;
mod records;

pub use export::{file_name, to_json, write_results, ExportError};
pub use records::{PageRecord, Record, ResultAccumulator, RunMetadata};
