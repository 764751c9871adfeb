//! Attachment gateway: image upload and location resolution over blob storage.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use rand::Rng;

use jotter_core::{defaults, AttachmentId, BlobStore, FetchableLocation, PickedImage, Result};

/// Uploads picked images and resolves attachment keys to fetchable URLs.
///
/// Keys are write-once: there is no replace or delete operation, so a note
/// edit can never change its image and a failed note create leaves the
/// uploaded blob behind unreferenced.
#[derive(Clone)]
pub struct AttachmentGateway {
    blobs: Arc<dyn BlobStore>,
}

impl AttachmentGateway {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Upload an image and return the attachment id under which it is stored.
    ///
    /// Returns only after the blob store has accepted the full payload; the
    /// caller can embed the id in a note knowing the bytes are already there.
    pub async fn upload(&self, image: &PickedImage) -> Result<AttachmentId> {
        let key = new_image_key();
        let content_type = detect_content_type(&image.data, &image.content_type);
        let started = Instant::now();
        self.blobs.put(&key, &image.data, &content_type).await?;
        tracing::debug!(
            key = %key,
            content_type = %content_type,
            size_bytes = image.data.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "image uploaded"
        );
        Ok(AttachmentId::new(key))
    }

    /// Resolve an attachment to a location the caller can fetch it from.
    ///
    /// Works for ids minted by [`upload`](Self::upload) in this session and
    /// for ids read back out of stored notes.
    pub async fn resolve(&self, id: &AttachmentId) -> Result<FetchableLocation> {
        self.blobs.fetchable_location(id.key()).await
    }
}

/// Mint a storage key for a new image.
///
/// Millisecond timestamp plus a random suffix keeps concurrent uploads from
/// colliding in practice; uniqueness is probabilistic, not enforced.
fn new_image_key() -> String {
    format!(
        "{}{}-{:08x}",
        defaults::IMAGE_KEY_PREFIX,
        Utc::now().timestamp_millis(),
        rand::thread_rng().gen::<u32>()
    )
}

/// Sniff the real content type from the payload, falling back to whatever
/// the picker claimed when the magic bytes are unrecognized.
fn detect_content_type(data: &[u8], claimed: &str) -> String {
    if let Some(kind) = infer::get(data) {
        return kind.mime_type().to_string();
    }
    claimed.to_string()
}
