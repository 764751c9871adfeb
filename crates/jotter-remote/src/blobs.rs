//! HTTP blob store backend.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use jotter_core::{defaults, BlobStore, Error, FetchableLocation, Result};

use crate::config::RemoteConfig;

/// Blob store backed by the remote HTTP service.
///
/// Keys may contain slashes; they map straight onto the blob path, so
/// `images/123-abc` lands at `/api/blobs/images/123-abc`.
pub struct HttpBlobStore {
    client: Client,
    base_url: String,
}

impl HttpBlobStore {
    /// Create a store for the given configuration.
    pub fn new(config: RemoteConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        info!("Initializing remote blob store: url={}", config.base_url);

        Self {
            client,
            base_url: config.base_url,
        }
    }

    /// Create a store from `JOTTER_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(RemoteConfig::from_env())
    }

    fn blob_url(&self, key: &str) -> String {
        format!("{}/api/blobs/{}", self.base_url, key)
    }

    fn location_url(&self, key: &str) -> String {
        format!("{}/api/blobs/{}/location", self.base_url, key)
    }
}

#[derive(Deserialize)]
struct LocationResponse {
    url: String,
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    #[instrument(skip(self, data), fields(subsystem = "remote", op = "put_blob", key = %key, size_bytes = data.len()))]
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<()> {
        let start = Instant::now();
        let response = self
            .client
            .put(self.blob_url(key))
            .header(CONTENT_TYPE, content_type)
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| Error::Upload(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Upload(format!(
                "Remote returned {}: {}",
                status, body
            )));
        }

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(duration_ms = elapsed, "blob stored");
        if elapsed > defaults::SLOW_REQUEST_MS {
            warn!(duration_ms = elapsed, slow = true, "Slow blob upload");
        }
        Ok(())
    }

    #[instrument(skip(self), fields(subsystem = "remote", op = "blob_location", key = %key))]
    async fn fetchable_location(&self, key: &str) -> Result<FetchableLocation> {
        let response = self
            .client
            .get(self.location_url(key))
            .send()
            .await
            .map_err(|e| Error::Resolve(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Resolve(format!(
                "Remote returned {}: {}",
                status, body
            )));
        }

        let result: LocationResponse = response
            .json()
            .await
            .map_err(|e| Error::Resolve(format!("Failed to parse response: {}", e)))?;

        debug!(url = %result.url, "location resolved");
        Ok(FetchableLocation { url: result.url })
    }
}
