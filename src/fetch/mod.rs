// src/fetch/mod.rs

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::ScrapeConfig;
use crate::document::HtmlDocument;
use crate::error::{ScrapeError, TransportError};

pub mod http;
pub mod urls;

pub use http::HttpTransport;

/// One GET request, no retries.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, TransportError>;
}

/// Fixed-delay retry budget for a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,
    /// Pause between a failed attempt and the next one.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(cfg: &ScrapeConfig) -> Self {
        Self {
            max_attempts: cfg.max_attempts.max(1),
            delay: cfg.retry_delay(),
        }
    }
}

/// Fetches report pages through a `Transport`, retrying failures.
pub struct Fetcher<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch `url` and parse it as HTML. After the last failed attempt the
    /// transport error is returned instead of retried.
    pub async fn fetch(&self, url: &Url) -> Result<HtmlDocument, ScrapeError> {
        let bytes = self.fetch_bytes(url).await?;
        Ok(HtmlDocument::from_utf8_lossy(&bytes))
    }

    async fn fetch_bytes(&self, url: &Url) -> Result<Vec<u8>, ScrapeError> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            attempt += 1;
            debug!(%url, attempt, "GET");
            match self.transport.get_bytes(url).await {
                Ok(bytes) => return Ok(bytes),
                Err(e) if attempt < max_attempts => {
                    warn!(
                        %url,
                        attempt,
                        max_attempts,
                        delay_secs = self.policy.delay.as_secs_f64(),
                        error = %e,
                        "fetch failed, retrying"
                    );
                    sleep(self.policy.delay).await;
                }
                Err(e) => {
                    error!(%url, attempts = attempt, error = %e, "exhausted retries");
                    return Err(ScrapeError::Transport {
                        url: url.to_string(),
                        attempts: attempt,
                        source: e,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    /// Serves canned pages by URL; unknown URLs fail. Each URL can be made
    /// to fail a number of times before it starts answering.
    #[derive(Default)]
    pub struct ScriptedTransport {
        pages: HashMap<String, String>,
        failures_left: Mutex<HashMap<String, usize>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        pub fn failing_first(self, url: &str, times: usize) -> Self {
            self.failures_left
                .lock()
                .unwrap()
                .insert(url.to_string(), times);
            self
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            {
                let mut left = self.failures_left.lock().unwrap();
                if let Some(n) = left.get_mut(url.as_str()) {
                    if *n > 0 {
                        *n -= 1;
                        return Err(TransportError::Unavailable(format!(
                            "connection reset by {}",
                            url
                        )));
                    }
                }
            }
            self.pages
                .get(url.as_str())
                .map(|body| body.as_bytes().to_vec())
                .ok_or_else(|| TransportError::Unavailable(format!("no route to {}", url)))
        }
    }
}
