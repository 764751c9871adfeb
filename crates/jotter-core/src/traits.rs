//! Collaborator contracts for jotter.
//!
//! These traits are the system boundary: the remote document store, the
//! remote blob store, and the device image picker. Concrete implementations
//! live in `jotter-remote` (HTTP adapters) and `jotter-store` (in-memory
//! backends and image sources); the gateways are written against the traits
//! so backends stay pluggable and testable.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::events::DocumentSubscription;
use crate::models::{FetchableLocation, PickedImage};

// =============================================================================
// DOCUMENT STORE
// =============================================================================

/// A remote collection-of-documents service (the note store collaborator).
///
/// Documents are identified by store-assigned string ids and carry free-form
/// JSON field maps; the typed mapping to notes happens in the gateway layer.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Open a live subscription to a collection.
    ///
    /// The subscription delivers the current contents immediately, then a
    /// fresh snapshot on every change, in the backend's own ordering. Each
    /// call opens an independent subscription.
    async fn subscribe(&self, collection: &str) -> Result<DocumentSubscription>;

    /// Append a new document and return its store-assigned id.
    async fn create(&self, collection: &str, fields: JsonValue) -> Result<String>;

    /// Merge `fields` into an existing document.
    ///
    /// Fields absent from the map are left untouched. Updating a document
    /// that does not exist is an error.
    async fn update(&self, collection: &str, id: &str, fields: JsonValue) -> Result<()>;

    /// Delete a document. Deleting an id that is already gone succeeds.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}

// =============================================================================
// BLOB STORE
// =============================================================================

/// A remote blob service (the attachment store collaborator).
///
/// Keys are flat strings; jotter uses the `images/` namespace. There is no
/// delete or overwrite operation: blobs orphaned by note deletion stay.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write one durable blob under `key`.
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<()>;

    /// Resolve a key to a directly fetchable URL.
    ///
    /// Stable for a given key (up to location expiry), so callers may cache
    /// the result for the lifetime of a screen.
    async fn fetchable_location(&self, key: &str) -> Result<FetchableLocation>;
}

// =============================================================================
// IMAGE SOURCE
// =============================================================================

/// The device image picker collaborator.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Ask the source for an image. `Ok(None)` means the user cancelled.
    async fn pick_image(&self) -> Result<Option<PickedImage>>;
}
