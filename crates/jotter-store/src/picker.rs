//! Image sources: where picked images come from.
//!
//! The platform picker UI lives outside this crate; callers inject an
//! [`ImageSource`] implementation. [`FileImageSource`] covers headless use
//! (examples, scripts) and [`StubImageSource`] drives tests.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use jotter_core::{Error, ImageSource, PickedImage, Result};

// ============================================================================
// FILE IMAGE SOURCE
// ============================================================================

/// Picks the same file on every call, sniffing its content type from the
/// payload.
pub struct FileImageSource {
    path: PathBuf,
}

impl FileImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ImageSource for FileImageSource {
    async fn pick_image(&self) -> Result<Option<PickedImage>> {
        let data = tokio::fs::read(&self.path).await?;
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        let content_type = infer::get(&data)
            .map(|kind| kind.mime_type().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        Ok(Some(PickedImage {
            file_name,
            content_type,
            data,
        }))
    }
}

// ============================================================================
// STUB IMAGE SOURCE
// ============================================================================

enum PickOutcome {
    Image(PickedImage),
    Cancelled,
    Failure(String),
}

/// Scriptable image source: queue outcomes, they are replayed in order.
///
/// An empty queue reads as the user cancelling the picker.
#[derive(Clone, Default)]
pub struct StubImageSource {
    queue: Arc<Mutex<VecDeque<PickOutcome>>>,
}

impl StubImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful pick of the given image.
    pub fn push_image(&self, image: PickedImage) {
        self.queue.lock().unwrap().push_back(PickOutcome::Image(image));
    }

    /// Queue a pick the user cancels.
    pub fn push_cancelled(&self) {
        self.queue.lock().unwrap().push_back(PickOutcome::Cancelled);
    }

    /// Queue a pick that fails with the given message.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.queue
            .lock()
            .unwrap()
            .push_back(PickOutcome::Failure(message.into()));
    }
}

#[async_trait]
impl ImageSource for StubImageSource {
    async fn pick_image(&self) -> Result<Option<PickedImage>> {
        let outcome = self.queue.lock().unwrap().pop_front();
        match outcome {
            Some(PickOutcome::Image(image)) => Ok(Some(image)),
            Some(PickOutcome::Cancelled) | None => Ok(None),
            Some(PickOutcome::Failure(message)) => Err(Error::ImageSource(message)),
        }
    }
}
