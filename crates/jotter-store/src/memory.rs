//! In-memory collaborator backends for deterministic testing and offline use.
//!
//! `MemoryDocumentStore` and `MemoryBlobStore` implement the collaborator
//! traits entirely in process: insertion-ordered collections, live snapshot
//! feeds, a call log for assertions, and deterministic failure injection.
//!
//! Always compiled (not test-gated) so integration tests in dependent crates
//! can use them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jotter_store::memory::MemoryDocumentStore;
//!
//! #[tokio::test]
//! async fn test_with_memory_store() {
//!     let store = MemoryDocumentStore::new();
//!     store.fail_next_ops(1);
//!
//!     let result = store.create("notes", serde_json::json!({"title": "x"})).await;
//!     assert!(result.is_err());
//!     assert_eq!(store.create_count(), 1);
//! }
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use jotter_core::{
    defaults, BlobStore, CollectionFeed, Document, DocumentStore, DocumentSubscription, Error,
    FetchableLocation, Result, Snapshot,
};

// =============================================================================
// DOCUMENT STORE
// =============================================================================

/// One logged document-store call.
#[derive(Debug, Clone)]
pub struct StoreCall {
    pub op: StoreOp,
    pub collection: String,
    pub id: Option<String>,
    pub fields: Option<JsonValue>,
    pub at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Subscribe,
    Create,
    Update,
    Delete,
}

#[derive(Default)]
struct StoreState {
    collections: HashMap<String, Vec<Document>>,
    feeds: HashMap<String, Arc<CollectionFeed>>,
}

/// In-memory [`DocumentStore`] with live feeds and a call log.
///
/// Documents keep insertion order; updates merge field maps in place; delete
/// is idempotent. Every mutation publishes a full snapshot to the
/// collection's feed, so subscribers behave exactly like a push backend.
#[derive(Clone)]
pub struct MemoryDocumentStore {
    state: Arc<Mutex<StoreState>>,
    call_log: Arc<Mutex<Vec<StoreCall>>>,
    fail_next: Arc<AtomicUsize>,
    fail_next_subscribes: Arc<AtomicUsize>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StoreState::default())),
            call_log: Arc::new(Mutex::new(Vec::new())),
            fail_next: Arc::new(AtomicUsize::new(0)),
            fail_next_subscribes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make the next `n` create/update/delete calls fail with a store error.
    pub fn fail_next_ops(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` subscribe calls fail with a store error.
    pub fn fail_next_subscribes(&self, n: usize) {
        self.fail_next_subscribes.store(n, Ordering::SeqCst);
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Clear the call log.
    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    pub fn create_count(&self) -> usize {
        self.op_count(StoreOp::Create)
    }

    pub fn update_count(&self) -> usize {
        self.op_count(StoreOp::Update)
    }

    pub fn delete_count(&self) -> usize {
        self.op_count(StoreOp::Delete)
    }

    fn op_count(&self, op: StoreOp) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.op == op)
            .count()
    }

    /// Current documents of a collection, in insertion order.
    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.state
            .lock()
            .unwrap()
            .collections
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }

    fn log(&self, op: StoreOp, collection: &str, id: Option<&str>, fields: Option<&JsonValue>) {
        self.call_log.lock().unwrap().push(StoreCall {
            op,
            collection: collection.to_string(),
            id: id.map(String::from),
            fields: fields.cloned(),
            at: Instant::now(),
        });
    }
}

/// Consume one unit of an armed failure counter. Returns true when the call
/// should fail.
fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

impl Default for MemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Get or create the feed for a collection, seeding a new feed with the
/// collection's current contents so subscribers always start from a snapshot.
fn feed_for(state: &mut StoreState, collection: &str) -> Arc<CollectionFeed> {
    let StoreState { collections, feeds } = state;
    feeds
        .entry(collection.to_string())
        .or_insert_with(|| {
            let feed = Arc::new(CollectionFeed::new(defaults::FEED_CAPACITY));
            let documents = collections.get(collection).cloned().unwrap_or_default();
            feed.publish(Snapshot::new(documents));
            feed
        })
        .clone()
}

fn publish_current(state: &mut StoreState, collection: &str) {
    let feed = feed_for(state, collection);
    let documents = state
        .collections
        .get(collection)
        .cloned()
        .unwrap_or_default();
    feed.publish(Snapshot::new(documents));
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn subscribe(&self, collection: &str) -> Result<DocumentSubscription> {
        self.log(StoreOp::Subscribe, collection, None, None);
        if take_failure(&self.fail_next_subscribes) {
            return Err(Error::Store("simulated subscribe failure".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        Ok(feed_for(&mut state, collection).subscribe())
    }

    async fn create(&self, collection: &str, fields: JsonValue) -> Result<String> {
        self.log(StoreOp::Create, collection, None, Some(&fields));
        if take_failure(&self.fail_next) {
            return Err(Error::Store("simulated store failure".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        let id = Uuid::now_v7().simple().to_string();
        state
            .collections
            .entry(collection.to_string())
            .or_default()
            .push(Document {
                id: id.clone(),
                fields,
            });
        publish_current(&mut state, collection);
        tracing::debug!(collection, document_id = %id, "memory store create");
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: JsonValue) -> Result<()> {
        self.log(StoreOp::Update, collection, Some(id), Some(&fields));
        if take_failure(&self.fail_next) {
            return Err(Error::Store("simulated store failure".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        let doc = state
            .collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
            .ok_or_else(|| Error::NotFound(format!("{collection}/{id}")))?;

        match (doc.fields.as_object_mut(), fields.as_object()) {
            (Some(existing), Some(patch)) => {
                for (key, value) in patch {
                    existing.insert(key.clone(), value.clone());
                }
            }
            _ => doc.fields = fields,
        }
        publish_current(&mut state, collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.log(StoreOp::Delete, collection, Some(id), None);
        if take_failure(&self.fail_next) {
            return Err(Error::Store("simulated store failure".to_string()));
        }
        let mut state = self.state.lock().unwrap();
        let removed = match state.collections.get_mut(collection) {
            Some(docs) => {
                let before = docs.len();
                docs.retain(|d| d.id != id);
                docs.len() != before
            }
            None => false,
        };
        if removed {
            publish_current(&mut state, collection);
        }
        Ok(())
    }
}

// =============================================================================
// BLOB STORE
// =============================================================================

/// One logged blob-store call.
#[derive(Debug, Clone)]
pub struct BlobCall {
    pub op: BlobOp,
    pub key: String,
    pub at: Instant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobOp {
    Put,
    Location,
}

/// A stored blob: payload plus the content type it was written with.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub data: Vec<u8>,
    pub content_type: String,
}

/// In-memory [`BlobStore`] with a call log and failure injection.
///
/// Locations are deterministic (`mem://blobs/{key}`), so `resolve` is
/// trivially idempotent. Looking up a key that was never written is a
/// resolve error.
#[derive(Clone)]
pub struct MemoryBlobStore {
    blobs: Arc<Mutex<HashMap<String, StoredBlob>>>,
    call_log: Arc<Mutex<Vec<BlobCall>>>,
    fail_next_puts: Arc<AtomicUsize>,
    fail_next_locations: Arc<AtomicUsize>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self {
            blobs: Arc::new(Mutex::new(HashMap::new())),
            call_log: Arc::new(Mutex::new(Vec::new())),
            fail_next_puts: Arc::new(AtomicUsize::new(0)),
            fail_next_locations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make the next `n` put calls fail with an upload error.
    pub fn fail_next_puts(&self, n: usize) {
        self.fail_next_puts.store(n, Ordering::SeqCst);
    }

    /// Make the next `n` location lookups fail with a resolve error.
    pub fn fail_next_locations(&self, n: usize) {
        self.fail_next_locations.store(n, Ordering::SeqCst);
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<BlobCall> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn put_count(&self) -> usize {
        self.op_count(BlobOp::Put)
    }

    pub fn location_count(&self) -> usize {
        self.op_count(BlobOp::Location)
    }

    fn op_count(&self, op: BlobOp) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.op == op)
            .count()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.blobs.lock().unwrap().contains_key(key)
    }

    /// The stored blob for a key, if any.
    pub fn blob(&self, key: &str) -> Option<StoredBlob> {
        self.blobs.lock().unwrap().get(key).cloned()
    }

    fn log(&self, op: BlobOp, key: &str) {
        self.call_log.lock().unwrap().push(BlobCall {
            op,
            key: key.to_string(),
            at: Instant::now(),
        });
    }
}

impl Default for MemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<()> {
        self.log(BlobOp::Put, key);
        if take_failure(&self.fail_next_puts) {
            return Err(Error::Upload("simulated upload failure".to_string()));
        }
        self.blobs.lock().unwrap().insert(
            key.to_string(),
            StoredBlob {
                data: data.to_vec(),
                content_type: content_type.to_string(),
            },
        );
        tracing::debug!(key, size = data.len(), "memory blob stored");
        Ok(())
    }

    async fn fetchable_location(&self, key: &str) -> Result<FetchableLocation> {
        self.log(BlobOp::Location, key);
        if take_failure(&self.fail_next_locations) {
            return Err(Error::Resolve("simulated location failure".to_string()));
        }
        if !self.blobs.lock().unwrap().contains_key(key) {
            return Err(Error::Resolve(format!("unknown key: {key}")));
        }
        Ok(FetchableLocation {
            url: format!("mem://blobs/{key}"),
        })
    }
}
