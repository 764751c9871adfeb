//! Note list screen flow.

use jotter_core::Note;
use jotter_store::NoteSubscription;
use tracing::warn;

/// States of the note list screen.
#[derive(Debug, Clone, PartialEq)]
pub enum ListState {
    /// Waiting for the first snapshot.
    Loading,
    /// Showing the current notes.
    Ready(Vec<Note>),
    /// The subscription failed; reopen the screen to try again.
    Error(String),
}

/// Live view of the note list.
///
/// The list renders whatever the store pushes, in the store's order, and
/// re-renders on every change. There is no manual refresh.
pub struct ListFlow {
    subscription: Option<NoteSubscription>,
    state: ListState,
}

impl ListFlow {
    pub(crate) fn new(subscription: NoteSubscription) -> Self {
        Self {
            subscription: Some(subscription),
            state: ListState::Loading,
        }
    }

    pub(crate) fn failed(message: String) -> Self {
        Self {
            subscription: None,
            state: ListState::Error(message),
        }
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// Wait for the next push update and return the new state.
    ///
    /// Once the flow is in [`ListState::Error`] it stays there.
    pub async fn next(&mut self) -> &ListState {
        let Some(subscription) = self.subscription.as_mut() else {
            return &self.state;
        };
        match subscription.recv().await {
            Ok(notes) => {
                self.state = ListState::Ready(notes);
            }
            Err(e) => {
                warn!(error = %e, "note list subscription failed");
                self.state = ListState::Error(e.to_string());
                self.subscription = None;
            }
        }
        &self.state
    }

    /// The notes currently shown. Empty while loading or after an error.
    pub fn notes(&self) -> &[Note] {
        match &self.state {
            ListState::Ready(notes) => notes,
            _ => &[],
        }
    }

    /// One display label per note, in list order.
    pub fn rows(&self) -> Vec<String> {
        self.notes().iter().map(|note| note.summary()).collect()
    }
}
