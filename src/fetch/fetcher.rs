// src/fetch/fetcher.rs
// =============================================================================
// Fetcher: a Transport plus the two policies every page fetch goes through.
//
// - Concurrency limit: a tokio Semaphore shared by the whole run. A fetch
//   waits for a permit, keeps it for all of its attempts, and returns it before
//   the caller starts parsing or scheduling children.
// - Retry: transient failures are retried with a fixed delay, anything else
//   ends the fetch right away.
//
// A fetch never returns an error. Callers only need to know "got a page" or
// "no page"; the reason is logged here.
// =============================================================================

use tokio::sync::Semaphore;
use tracing::{debug, error, warn};
use url::Url;

use super::decode::decode;
use super::http::{FetchError, Transport};
use crate::config::RetryPolicy;

pub struct Fetcher<T> {
    transport: T,
    limiter: Semaphore,
    retry: RetryPolicy,
}

impl<T: Transport> Fetcher<T> {
    /// `rate_limit` is the number of fetches allowed in flight at once
    pub fn new(transport: T, rate_limit: usize, retry: RetryPolicy) -> Self {
        Self {
            transport,
            limiter: Semaphore::new(rate_limit),
            retry,
        }
    }

    /// Fetches and decodes `url`, or returns None if no usable page came back.
    pub async fn fetch(&self, url: &Url) -> Option<String> {
        // The semaphore is never closed, so acquire() cannot fail in practice
        let _permit = match self.limiter.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                error!(%url, error = %e, "fetch limiter closed");
                return None;
            }
        };

        let max_attempts = self.retry.max_attempts;
        for attempt in 1..=max_attempts {
            match self.attempt(url).await {
                Ok(text) => {
                    debug!(%url, attempt, bytes = text.len(), "fetched page");
                    return Some(text);
                }
                Err(e) if e.is_transient() => {
                    warn!(%url, attempt, max_attempts, error = %e, "transient fetch error");
                    if attempt < max_attempts {
                        tokio::time::sleep(self.retry.delay).await;
                    }
                }
                Err(e) => {
                    error!(%url, error = %e, "fetch failed, skipping");
                    return None;
                }
            }
        }

        warn!(%url, max_attempts, "giving up after repeated connection failures");
        None
    }

    async fn attempt(&self, url: &Url) -> Result<String, FetchError> {
        let raw = self.transport.get(url).await?;
        let text = decode(&raw.body, raw.content_type.as_deref());
        if text.is_empty() {
            return Err(FetchError::Decode);
        }
        Ok(text)
    }
}
