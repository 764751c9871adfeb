//! # jotter-remote
//!
//! HTTP backends for the jotter document and blob stores.
//!
//! This crate provides:
//! - [`HttpDocumentStore`]: documents over the remote JSON API, with
//!   poll-driven live subscriptions
//! - [`HttpBlobStore`]: image blobs and fetchable-location resolution
//! - [`RemoteConfig`]: shared connection settings, loadable from `JOTTER_*`
//!   environment variables
//!
//! ## Example
//!
//! ```rust,ignore
//! use jotter_remote::{DocumentStore, HttpDocumentStore, RemoteConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RemoteConfig::from_env();
//!     config.validate()?;
//!
//!     let store = HttpDocumentStore::new(config);
//!     let mut subscription = store.subscribe("notes").await?;
//!     let snapshot = subscription.recv().await?;
//!     println!("{} documents", snapshot.len());
//!     Ok(())
//! }
//! ```
pub mod blobs;
pub mod config;
pub mod documents;

// Re-export backends and config
pub use blobs::HttpBlobStore;
pub use config::RemoteConfig;
pub use documents::HttpDocumentStore;

// Re-export core types
pub use jotter_core::*;
