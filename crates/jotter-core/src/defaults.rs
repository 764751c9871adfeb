//! Centralized default constants for jotter.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers. When adding new constants, place them in the appropriate section
//! and document the rationale for the chosen value.

// =============================================================================
// COLLECTIONS & KEYS
// =============================================================================

/// Document collection holding all notes.
pub const NOTES_COLLECTION: &str = "notes";

/// Flat key namespace for uploaded images in the blob store.
pub const IMAGE_KEY_PREFIX: &str = "images/";

// =============================================================================
// LIST RENDERING
// =============================================================================

/// Characters of a note title shown in a list row before truncation.
pub const SUMMARY_LENGTH: usize = 30;

// =============================================================================
// LIVE FEED
// =============================================================================

/// Broadcast buffer capacity for collection feeds.
///
/// Snapshots are full collection states, so a lagged receiver only needs the
/// newest one; a small buffer is enough.
pub const FEED_CAPACITY: usize = 32;

// =============================================================================
// REMOTE SYNC
// =============================================================================

/// Default base URL for the sync server.
pub const REMOTE_URL: &str = "http://127.0.0.1:8640";

/// Poll interval for live subscriptions against the HTTP document API, in
/// milliseconds.
pub const POLL_INTERVAL_MS: u64 = 2_000;

/// Timeout for any single HTTP request to the sync server, in seconds.
/// Bounds how long a flow can sit in `Submitting`.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Requests slower than this are logged at warn level, in milliseconds.
pub const SLOW_REQUEST_MS: u64 = 1_000;
