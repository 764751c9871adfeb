//! # jotter-store
//!
//! Storage gateways for jotter.
//!
//! This crate provides:
//! - Typed note operations over any document-store backend
//! - Image upload and location resolution over any blob-store backend
//! - Image sources for headless use and for tests
//! - In-memory backends with call logs and failure injection
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use jotter_store::{MemoryDocumentStore, NoteStoreGateway};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryDocumentStore::new());
//!     let notes = NoteStoreGateway::new(store);
//!
//!     let id = notes.create("Groceries", "Milk, eggs", None).await?;
//!     println!("Created note: {}", id);
//!     Ok(())
//! }
//! ```
pub mod attachments;
pub mod memory;
pub mod notes;
pub mod picker;

// Re-export gateways and backends
pub use attachments::AttachmentGateway;
pub use memory::{MemoryBlobStore, MemoryDocumentStore};
pub use notes::{NoteStoreGateway, NoteSubscription};
pub use picker::{FileImageSource, StubImageSource};

// Re-export core types
pub use jotter_core::*;
