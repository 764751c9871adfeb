//! HTTP document store backend.
//!
//! Talks to the remote document service over its JSON API. Subscriptions are
//! driven by polling: each one fetches the collection up front, then a
//! background task re-fetches on an interval and publishes a snapshot
//! whenever the contents change. The task stops on its own once the
//! subscriber is gone.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{debug, info, instrument, warn};

use jotter_core::{
    defaults, CollectionFeed, Document, DocumentStore, DocumentSubscription, Error, Result,
    Snapshot,
};

use crate::config::RemoteConfig;

/// Document store backed by the remote HTTP service.
pub struct HttpDocumentStore {
    client: Client,
    base_url: String,
    poll_interval: Duration,
}

impl HttpDocumentStore {
    /// Create a store for the given configuration.
    pub fn new(config: RemoteConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        info!(
            "Initializing remote document store: url={}, poll_interval={}ms",
            config.base_url, config.poll_interval_ms
        );

        Self {
            client,
            base_url: config.base_url,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        }
    }

    /// Create a store from `JOTTER_*` environment variables.
    pub fn from_env() -> Self {
        Self::new(RemoteConfig::from_env())
    }

    fn documents_url(&self, collection: &str) -> String {
        format!("{}/api/collections/{}/documents", self.base_url, collection)
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!(
            "{}/api/collections/{}/documents/{}",
            self.base_url, collection, id
        )
    }
}

#[derive(Deserialize)]
struct DocumentPayload {
    id: String,
    #[serde(default)]
    fields: JsonValue,
}

#[derive(Deserialize)]
struct DocumentListResponse {
    documents: Vec<DocumentPayload>,
}

#[derive(Serialize)]
struct CreateDocumentRequest<'a> {
    fields: &'a JsonValue,
}

#[derive(Deserialize)]
struct CreateDocumentResponse {
    id: String,
}

#[derive(Serialize)]
struct UpdateDocumentRequest<'a> {
    fields: &'a JsonValue,
}

/// Fetch the current contents of a collection as a snapshot.
async fn fetch_snapshot(client: &Client, url: &str) -> Result<Snapshot> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::Store(format!("Request failed: {}", e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Store(format!(
            "Remote returned {}: {}",
            status, body
        )));
    }

    let result: DocumentListResponse = response
        .json()
        .await
        .map_err(|e| Error::Store(format!("Failed to parse response: {}", e)))?;

    let documents = result
        .documents
        .into_iter()
        .map(|DocumentPayload { id, fields }| Document { id, fields })
        .collect();
    Ok(Snapshot::new(documents))
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    #[instrument(skip(self), fields(subsystem = "remote", op = "subscribe", collection = %collection))]
    async fn subscribe(&self, collection: &str) -> Result<DocumentSubscription> {
        let url = self.documents_url(collection);
        let initial = fetch_snapshot(&self.client, &url).await?;
        debug!(documents = initial.len(), "initial snapshot fetched");

        let feed = Arc::new(CollectionFeed::new(defaults::FEED_CAPACITY));
        feed.publish(initial.clone());
        let subscription = feed.subscribe();

        let client = self.client.clone();
        let interval = self.poll_interval;
        let collection = collection.to_string();
        tokio::spawn(async move {
            let mut last = initial;
            loop {
                tokio::time::sleep(interval).await;
                if feed.subscriber_count() == 0 {
                    debug!(collection = %collection, "subscriber gone, stopping poll");
                    break;
                }
                match fetch_snapshot(&client, &url).await {
                    Ok(snapshot) => {
                        if snapshot != last {
                            feed.publish(snapshot.clone());
                            last = snapshot;
                        }
                    }
                    Err(e) => {
                        // Transient poll failures keep the last snapshot; the
                        // next tick tries again.
                        warn!(collection = %collection, error = %e, "poll failed");
                    }
                }
            }
        });

        Ok(subscription)
    }

    #[instrument(skip(self, fields), fields(subsystem = "remote", op = "create", collection = %collection))]
    async fn create(&self, collection: &str, fields: JsonValue) -> Result<String> {
        let start = Instant::now();
        let response = self
            .client
            .post(self.documents_url(collection))
            .json(&CreateDocumentRequest { fields: &fields })
            .send()
            .await
            .map_err(|e| Error::Store(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Store(format!(
                "Remote returned {}: {}",
                status, body
            )));
        }

        let result: CreateDocumentResponse = response
            .json()
            .await
            .map_err(|e| Error::Store(format!("Failed to parse response: {}", e)))?;

        let elapsed = start.elapsed().as_millis() as u64;
        debug!(
            document_id = %result.id,
            duration_ms = elapsed,
            "document created"
        );
        if elapsed > defaults::SLOW_REQUEST_MS {
            warn!(duration_ms = elapsed, slow = true, "Slow create operation");
        }
        Ok(result.id)
    }

    #[instrument(skip(self, fields), fields(subsystem = "remote", op = "update", collection = %collection, document_id = %id))]
    async fn update(&self, collection: &str, id: &str, fields: JsonValue) -> Result<()> {
        let response = self
            .client
            .patch(self.document_url(collection, id))
            .json(&UpdateDocumentRequest { fields: &fields })
            .send()
            .await
            .map_err(|e| Error::Store(format!("Request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!(
                "document {} in {}",
                id, collection
            )));
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Store(format!(
                "Remote returned {}: {}",
                status, body
            )));
        }

        debug!("document updated");
        Ok(())
    }

    #[instrument(skip(self), fields(subsystem = "remote", op = "delete", collection = %collection, document_id = %id))]
    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let response = self
            .client
            .delete(self.document_url(collection, id))
            .send()
            .await
            .map_err(|e| Error::Store(format!("Request failed: {}", e)))?;

        // Already-gone documents count as deleted.
        if response.status() == StatusCode::NOT_FOUND {
            debug!("document already absent");
            return Ok(());
        }
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Store(format!(
                "Remote returned {}: {}",
                status, body
            )));
        }

        debug!("document deleted");
        Ok(())
    }
}
