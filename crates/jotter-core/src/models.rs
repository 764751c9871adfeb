//! Core data models for jotter.

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::text::summarize;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque note identifier assigned by the document store on creation.
///
/// A draft under creation has no identifier; a `NoteId` only ever refers to
/// a persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for NoteId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for NoteId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Opaque token correlating a note to a blob in the remote blob store.
///
/// The token is the blob's storage key (flat `images/` namespace), resolvable
/// to a fetchable location via the attachment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttachmentId(String);

impl AttachmentId {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The underlying blob storage key.
    pub fn key(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AttachmentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for AttachmentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AttachmentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ============================================================================
// Note entity
// ============================================================================

/// A persisted note: title, body, optional image attachment.
///
/// The remote store is the single source of truth; a `Note` held by a screen
/// is a disposable local copy. Two notes are equal when they carry the same
/// store identity, regardless of field content.
#[derive(Debug, Clone, Serialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<AttachmentId>,
}

impl Note {
    pub fn has_attachment(&self) -> bool {
        self.attachment.is_some()
    }

    /// List-row label: the title truncated to the standard summary length.
    pub fn summary(&self) -> String {
        summarize(&self.title, defaults::SUMMARY_LENGTH)
    }
}

impl PartialEq for Note {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Note {}

impl std::hash::Hash for Note {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// ============================================================================
// Wire shapes
// ============================================================================

/// The serde shape of a note document's fields in the `notes` collection.
///
/// This is the single source of truth for the mapping between [`Note`] and
/// the document store's field maps. `attachment_key` is absent (not null)
/// when the note has no attachment, so merge updates that omit it leave an
/// existing attachment untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteFields {
    pub title: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_key: Option<String>,
}

impl NoteFields {
    pub fn from_parts(title: &str, body: &str, attachment: Option<&AttachmentId>) -> Self {
        Self {
            title: title.to_string(),
            body: body.to_string(),
            attachment_key: attachment.map(|a| a.key().to_string()),
        }
    }

    pub fn into_note(self, id: NoteId) -> Note {
        Note {
            id,
            title: self.title,
            body: self.body,
            attachment: self.attachment_key.map(AttachmentId::new),
        }
    }
}

/// A raw document as reported by the document-store collaborator:
/// store-assigned id plus a free-form field map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: serde_json::Value,
}

// ============================================================================
// Attachments
// ============================================================================

/// A local image handle produced by the image-source collaborator.
///
/// `content_type` is the type claimed by the source; the attachment gateway
/// re-detects it from magic bytes before upload.
#[derive(Debug, Clone, PartialEq)]
pub struct PickedImage {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// A directly fetchable URL for an attachment blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchableLocation {
    pub url: String,
}

impl std::fmt::Display for FetchableLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}
