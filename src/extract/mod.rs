// src/extract/mod.rs
// =============================================================================
// Reading pages and deciding which links to follow.
//
// Submodules:
// - document: the Document trait and its scraper-backed implementation
// - page: title / representative image / links extraction
// - scope: same-host link validation
// =============================================================================

mod document;
mod page;
mod scope;

pub use document::{Document, ScraperDocument};
pub use page::{extract, extract_from, representative_image, PageData, NO_TITLE};
pub use scope::{netloc, Scope};
