//! Error types for jotter.

use thiserror::Error;

/// Result type alias using jotter's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for jotter operations.
///
/// Variants mirror the failure categories of the two remote collaborators:
/// `Store` for document-store operations, `Upload`/`Resolve` for the blob
/// store. An empty-field save is deliberately *not* an error; flows report
/// it as a skipped submit (see `jotter-app`).
#[derive(Error, Debug)]
pub enum Error {
    /// Document store operation failed (transport or permission)
    #[error("Store error: {0}")]
    Store(String),

    /// Blob upload failed
    #[error("Upload error: {0}")]
    Upload(String),

    /// Attachment location lookup failed
    #[error("Resolve error: {0}")]
    Resolve(String),

    /// Image source failed to produce a picked image
    #[error("Image source error: {0}")]
    ImageSource(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Live subscription ended because the feed was closed
    #[error("Subscription closed")]
    SubscriptionClosed,

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
