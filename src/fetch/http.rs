// src/fetch/http.rs
// =============================================================================
// The network side of fetching: one GET, no retries.
//
// Retrying and concurrency limiting live one level up in fetcher.rs. This file
// only knows how to turn a URL into raw bytes and how to sort reqwest's errors
// into the two buckets the crawler cares about:
// - transient (connection refused, server hung up) -> worth another attempt
// - everything else -> give up on this page
//
// The Transport trait is the seam that lets tests swap the network for an
// in-memory site.
// =============================================================================

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::CrawlConfig;

/// Why a single GET did not produce a usable page
#[derive(Debug, Error)]
pub enum FetchError {
    /// Could not open a connection (refused, unreachable, DNS)
    #[error("connection failed: {0}")]
    Connect(String),
    /// The server dropped the connection while we were talking to it
    #[error("server disconnected: {0}")]
    Disconnected(String),
    #[error("request timed out")]
    Timeout,
    /// The body decoded to nothing
    #[error("response body could not be decoded")]
    Decode,
    #[error("request failed: {0}")]
    Other(String),
}

impl FetchError {
    /// Connection-level failures are the only ones worth retrying
    pub fn is_transient(&self) -> bool {
        matches!(self, FetchError::Connect(_) | FetchError::Disconnected(_))
    }
}

/// Body bytes plus the Content-Type header, before any charset decoding
#[derive(Debug, Clone, Default)]
pub struct RawResponse {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// Performs one GET request.
///
/// Implementations must not retry on their own; `Fetcher` owns that policy.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    async fn get(&self, url: &Url) -> Result<RawResponse, FetchError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn get(&self, url: &Url) -> Result<RawResponse, FetchError> {
        (**self).get(url).await
    }
}

/// reqwest-backed transport used by the real crawler
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(config: &CrawlConfig) -> Result<Self, reqwest::Error> {
        // One client for the whole run so connections are pooled
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(10))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(categorize_error)?;

        // Error pages are still pages: a 404 with a body gets recorded and its
        // links followed. Only an empty body ends the branch.
        let status = response.status();
        if !status.is_success() {
            debug!(%url, status = status.as_u16(), "non-success status, keeping body");
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let body = response.bytes().await.map_err(categorize_error)?;

        Ok(RawResponse {
            body: body.to_vec(),
            content_type,
        })
    }
}

// Sorts a reqwest error into a FetchError
//
// Order matters: a connect timeout reports both is_connect() and is_timeout(),
// and we want it treated as a connection failure.
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_request() || error.is_body() {
        // Connection reset or closed before the message completed
        FetchError::Disconnected(error.to_string())
    } else {
        FetchError::Other(error.to_string())
    }
}
