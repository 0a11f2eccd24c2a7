use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use super::Transport;
use crate::error::{ScrapeError, TransportError};

/// `Transport` backed by a reqwest client with a per-request timeout.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScrapeError::Config(format!("building HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_bytes(&self, url: &Url) -> Result<Vec<u8>, TransportError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(resp.bytes().await?.to_vec())
    }
}
