//! # jotter-app
//!
//! Note lifecycle flows for jotter.
//!
//! This crate provides:
//! - [`Notebook`]: the app context, wiring gateways to injected backends
//! - [`ListFlow`]: the live note list
//! - [`CreateFlow`]: drafting and saving a new note, with optional image
//! - [`EditFlow`]: viewing and editing an existing note
//!
//! Gateway failures never escape a flow: they are logged, the flow lands in
//! its `Failed`/`Error` state, and the user's input stays put.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jotter_app::{MemoryBlobStore, MemoryDocumentStore, Notebook};
//!
//! #[tokio::main]
//! async fn main() {
//!     let notebook = Notebook::new(
//!         Arc::new(MemoryDocumentStore::new()),
//!         Arc::new(MemoryBlobStore::new()),
//!     );
//!
//!     let mut create = notebook.create();
//!     create.set_title("Groceries");
//!     create.set_body("Milk, eggs");
//!     create.submit().await;
//! }
//! ```

use std::sync::Arc;

use tracing::warn;

pub mod create;
pub mod edit;
pub mod list;

// Re-export flows and their states
pub use create::{CreateFlow, CreateState};
pub use edit::{EditFlow, EditState};
pub use list::{ListFlow, ListState};

// Re-export gateways, backends, and core types
pub use jotter_store::*;

/// Outcome of a save attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The note was persisted under this id.
    Saved(NoteId),
    /// Nothing was sent: validation declined the input, or the flow was not
    /// in a submittable state.
    Skipped,
    /// A gateway call failed; the flow keeps its input.
    Failed(String),
}

/// The app context: every screen flow starts here.
///
/// Backends are injected, which is what lets the whole lifecycle run against
/// the in-memory stores in tests and against the HTTP stores in production.
pub struct Notebook {
    /// Note gateway for persistence and the live list.
    pub notes: NoteStoreGateway,
    /// Attachment gateway for image upload and resolution.
    pub attachments: AttachmentGateway,
}

impl Notebook {
    /// Wire a notebook to the given backends.
    pub fn new(documents: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            notes: NoteStoreGateway::new(documents),
            attachments: AttachmentGateway::new(blobs),
        }
    }

    /// Open the note list screen.
    ///
    /// A failed subscription opens the screen in its error state rather than
    /// propagating.
    pub async fn list(&self) -> ListFlow {
        match self.notes.list().await {
            Ok(subscription) => ListFlow::new(subscription),
            Err(e) => {
                warn!(error = %e, "failed to open note list");
                ListFlow::failed(e.to_string())
            }
        }
    }

    /// Start drafting a new note.
    pub fn create(&self) -> CreateFlow {
        CreateFlow::new(self.notes.clone(), self.attachments.clone())
    }

    /// Open a note for viewing and editing.
    pub async fn edit(&self, note: Note) -> EditFlow {
        EditFlow::open(self.notes.clone(), &self.attachments, note).await
    }

    /// Delete a note.
    pub async fn delete(&self, id: &NoteId) -> Result<()> {
        if let Err(e) = self.notes.delete(id).await {
            warn!(note_id = %id, error = %e, "note delete failed");
            return Err(e);
        }
        Ok(())
    }
}
