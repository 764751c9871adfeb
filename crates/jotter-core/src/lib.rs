//! # jotter-core
//!
//! Core types, traits, and abstractions for jotter.
//!
//! This crate provides the note entity, the error type, the collaborator
//! contracts (document store, blob store, image source), and the snapshot
//! feed that powers live note-list subscriptions. The other jotter crates
//! build on these definitions.

pub mod defaults;
pub mod error;
pub mod events;
pub mod models;
pub mod text;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use events::{CollectionFeed, DocumentSubscription, Snapshot};
pub use models::*;
pub use text::summarize;
pub use traits::{BlobStore, DocumentStore, ImageSource};
