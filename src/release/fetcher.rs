//! Fetcher trait for downloading the releases feed

use std::time::Duration;

#[cfg(test)]
use mockall::automock;
use tracing::{debug, warn};

use crate::release::error::FetchError;

/// Trait for fetching raw bytes from a remote source
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the body at `url`
    ///
    /// # Arguments
    /// * `url` - The URL to GET
    /// * `timeout` - Upper bound for the whole request, body included
    ///
    /// # Returns
    /// * `Ok(Vec<u8>)` - The response body of a successful response
    /// * `Err(FetchError)` - On timeout, transport failure or non-2xx status
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError>;
}

/// Fetcher implementation backed by reqwest
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(concat!("electron-info/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, FetchError> {
        debug!("Fetching {} (timeout {:?})", url, timeout);

        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Releases source returned status {}: {}", status, url);
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(url, timeout, e))?;

        debug!("Received {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}
