// src/fetch/mod.rs
// =============================================================================
// Everything between a URL and the decoded text of the page behind it.
//
// Submodules:
// - http: the Transport trait, the reqwest-backed HttpTransport and FetchError
// - decode: charset guessing for raw bytes
// - fetcher: concurrency limit + retry around a Transport
// =============================================================================

mod decode;
mod fetcher;
mod http;

pub use decode::decode;
pub use fetcher::Fetcher;
pub use http::{FetchError, HttpTransport, RawResponse, Transport};
