//! Note viewing and editing screen flow.

use jotter_core::{AttachmentId, FetchableLocation, Note, NoteId};
use jotter_store::{AttachmentGateway, NoteStoreGateway};
use tracing::{debug, warn};

use crate::SubmitOutcome;

/// States of the note editing screen.
#[derive(Debug, Clone, PartialEq)]
pub enum EditState {
    /// Showing the note, input editable.
    Viewing,
    /// Save in progress.
    Submitting,
    /// The changes were persisted; this flow is finished.
    Done,
    /// Save failed; the input is intact for another attempt.
    Failed(String),
}

/// An open note: title and body editable, attachment display-only.
///
/// The attachment location is resolved once when the screen opens and cached
/// for its lifetime. Saving sends only the title and body, so the stored
/// attachment reference cannot change here.
pub struct EditFlow {
    notes: NoteStoreGateway,
    note_id: NoteId,
    title: String,
    body: String,
    attachment: Option<AttachmentId>,
    location: Option<FetchableLocation>,
    state: EditState,
}

impl EditFlow {
    pub(crate) async fn open(
        notes: NoteStoreGateway,
        attachments: &AttachmentGateway,
        note: Note,
    ) -> Self {
        let location = match &note.attachment {
            Some(id) => match attachments.resolve(id).await {
                Ok(location) => Some(location),
                Err(e) => {
                    // The screen still opens; the image slot just stays empty.
                    warn!(attachment = %id, error = %e, "failed to resolve attachment");
                    None
                }
            },
            None => None,
        };

        Self {
            notes,
            note_id: note.id,
            title: note.title,
            body: note.body,
            attachment: note.attachment,
            location,
            state: EditState::Viewing,
        }
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn note_id(&self) -> &NoteId {
        &self.note_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn has_attachment(&self) -> bool {
        self.attachment.is_some()
    }

    /// The resolved attachment location, fetched once when the screen opened.
    pub fn attachment_location(&self) -> Option<&FetchableLocation> {
        self.location.as_ref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Try to save the edited title and body.
    ///
    /// With an empty title or body nothing is sent and the note keeps its
    /// stored contents. A submit while one is in flight, or after the save
    /// went through, is also skipped.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if matches!(self.state, EditState::Submitting | EditState::Done) {
            return SubmitOutcome::Skipped;
        }
        if self.title.is_empty() || self.body.is_empty() {
            debug!(note_id = %self.note_id, "empty title or body, skipping save");
            return SubmitOutcome::Skipped;
        }
        self.state = EditState::Submitting;

        match self.notes.update(&self.note_id, &self.title, &self.body).await {
            Ok(()) => {
                self.state = EditState::Done;
                SubmitOutcome::Saved(self.note_id.clone())
            }
            Err(e) => {
                warn!(note_id = %self.note_id, error = %e, "note update failed");
                self.state = EditState::Failed(e.to_string());
                SubmitOutcome::Failed(e.to_string())
            }
        }
    }
}
