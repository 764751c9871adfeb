//! Note creation screen flow.

use jotter_core::{ImageSource, NoteId, PickedImage};
use jotter_store::{AttachmentGateway, NoteStoreGateway};
use tracing::{debug, warn};

use crate::SubmitOutcome;

/// States of the note creation screen.
#[derive(Debug, Clone, PartialEq)]
pub enum CreateState {
    /// Collecting input.
    Editing,
    /// Submission in progress.
    Submitting,
    /// The note was persisted; this flow is finished.
    Done(NoteId),
    /// Submission failed; the input is intact for another attempt.
    Failed(String),
}

/// Draft of a new note.
///
/// Submission runs as one sequential pipeline: when an image is selected it
/// is uploaded first, and the note is only created once the upload has
/// returned an attachment id. A failed upload therefore never yields a note
/// pointing at a missing image.
pub struct CreateFlow {
    notes: NoteStoreGateway,
    attachments: AttachmentGateway,
    title: String,
    body: String,
    image: Option<PickedImage>,
    state: CreateState,
}

impl CreateFlow {
    pub(crate) fn new(notes: NoteStoreGateway, attachments: AttachmentGateway) -> Self {
        Self {
            notes,
            attachments,
            title: String::new(),
            body: String::new(),
            image: None,
            state: CreateState::Editing,
        }
    }

    pub fn state(&self) -> &CreateState {
        &self.state
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn image(&self) -> Option<&PickedImage> {
        self.image.as_ref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    /// Ask the source for an image.
    ///
    /// Cancelling keeps the current selection; a source failure is logged and
    /// also keeps the current selection.
    pub async fn pick_image(&mut self, source: &dyn ImageSource) {
        match source.pick_image().await {
            Ok(Some(image)) => {
                debug!(file_name = %image.file_name, "image selected");
                self.image = Some(image);
            }
            Ok(None) => {
                debug!("image pick cancelled");
            }
            Err(e) => {
                warn!(error = %e, "image pick failed");
            }
        }
    }

    /// Drop the selected image.
    pub fn clear_image(&mut self) {
        self.image = None;
    }

    /// Try to save the note.
    ///
    /// With an empty title or body nothing is sent and the draft stays as it
    /// is. A submit while one is in flight, or after the note was saved, is
    /// also skipped.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if matches!(self.state, CreateState::Submitting | CreateState::Done(_)) {
            return SubmitOutcome::Skipped;
        }
        if self.title.is_empty() || self.body.is_empty() {
            debug!("empty title or body, skipping save");
            return SubmitOutcome::Skipped;
        }
        self.state = CreateState::Submitting;

        let attachment = match &self.image {
            Some(image) => match self.attachments.upload(image).await {
                Ok(id) => Some(id),
                Err(e) => {
                    warn!(error = %e, "image upload failed, note not created");
                    self.state = CreateState::Failed(e.to_string());
                    return SubmitOutcome::Failed(e.to_string());
                }
            },
            None => None,
        };

        match self
            .notes
            .create(&self.title, &self.body, attachment.as_ref())
            .await
        {
            Ok(id) => {
                self.state = CreateState::Done(id.clone());
                SubmitOutcome::Saved(id)
            }
            Err(e) => {
                warn!(error = %e, "note create failed");
                self.state = CreateState::Failed(e.to_string());
                SubmitOutcome::Failed(e.to_string())
            }
        }
    }
}
