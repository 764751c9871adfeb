//! Note store gateway: typed note operations over a document-store backend.

use std::sync::Arc;
use std::time::Instant;

use jotter_core::{
    defaults, AttachmentId, Document, DocumentStore, DocumentSubscription, Note, NoteFields,
    NoteId, Result,
};

/// Thin adapter translating note operations into document-store calls.
///
/// Owns no state beyond the injected backend handle and the collection name.
/// Validation (the empty-field no-op policy) is the lifecycle controller's
/// job; the gateway persists exactly what it is given.
#[derive(Clone)]
pub struct NoteStoreGateway {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl NoteStoreGateway {
    /// Gateway over the standard `notes` collection.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            collection: defaults::NOTES_COLLECTION.to_string(),
        }
    }

    /// Point the gateway at a different collection (tests, sandboxes).
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Open a live, infinite sequence of the note list.
    ///
    /// Each call opens an independent subscription that starts from the
    /// current contents. Ordering is whatever the backend reports; no
    /// client-side sort is imposed.
    pub async fn list(&self) -> Result<NoteSubscription> {
        let inner = self.store.subscribe(&self.collection).await?;
        Ok(NoteSubscription { inner })
    }

    /// Persist a new note and return its store-assigned id.
    pub async fn create(
        &self,
        title: &str,
        body: &str,
        attachment: Option<&AttachmentId>,
    ) -> Result<NoteId> {
        let fields = serde_json::to_value(NoteFields::from_parts(title, body, attachment))?;
        let started = Instant::now();
        let id = self.store.create(&self.collection, fields).await?;
        tracing::debug!(
            collection = %self.collection,
            note_id = %id,
            has_attachment = attachment.is_some(),
            duration_ms = started.elapsed().as_millis() as u64,
            "note created"
        );
        Ok(NoteId::new(id))
    }

    /// Replace a note's title and body.
    ///
    /// The payload carries only those two fields, so the merge update leaves
    /// any attachment key in place; edits cannot change the attached image.
    pub async fn update(&self, id: &NoteId, title: &str, body: &str) -> Result<()> {
        let fields = serde_json::to_value(NoteFields::from_parts(title, body, None))?;
        self.store
            .update(&self.collection, id.as_str(), fields)
            .await?;
        tracing::debug!(collection = %self.collection, note_id = %id, "note updated");
        Ok(())
    }

    /// Delete a note by id.
    pub async fn delete(&self, id: &NoteId) -> Result<()> {
        self.store.delete(&self.collection, id.as_str()).await?;
        tracing::debug!(collection = %self.collection, note_id = %id, "note deleted");
        Ok(())
    }
}

/// One subscriber's live view of the note list.
pub struct NoteSubscription {
    inner: DocumentSubscription,
}

impl NoteSubscription {
    /// Wait for the next note-list snapshot.
    pub async fn recv(&mut self) -> Result<Vec<Note>> {
        let snapshot = self.inner.recv().await?;
        Ok(map_documents(snapshot.documents))
    }
}

/// Map raw documents to notes, skipping any that do not decode.
///
/// A malformed document (written by another client, or a schema drift) drops
/// out of the list with a warning instead of poisoning the whole snapshot.
fn map_documents(documents: Vec<Document>) -> Vec<Note> {
    documents
        .into_iter()
        .filter_map(|Document { id, fields }| match serde_json::from_value::<NoteFields>(fields) {
            Ok(note_fields) => Some(note_fields.into_note(NoteId::new(id))),
            Err(e) => {
                tracing::warn!(document_id = %id, error = %e, "skipping malformed note document");
                None
            }
        })
        .collect()
}
