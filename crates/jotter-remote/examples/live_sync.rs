//! Live note synchronization against a running remote service.
//!
//! Subscribes to the `notes` collection and prints every snapshot as it
//! arrives, resolving the fetchable location of any attached image. Run a
//! second client against the same service to watch changes flow through.
//!
//! # Usage
//!
//! ```bash
//! JOTTER_REMOTE_URL=http://127.0.0.1:8640 \
//! JOTTER_POLL_INTERVAL_MS=1000 \
//! cargo run --example live_sync
//! ```

use jotter_remote::{BlobStore, DocumentStore, HttpBlobStore, HttpDocumentStore, RemoteConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "jotter_remote=debug,live_sync=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RemoteConfig::from_env();
    config.validate()?;
    println!("Watching notes at {}", config.base_url);

    // Both adapters read the same JOTTER_* variables.
    let store = HttpDocumentStore::from_env();
    let blobs = HttpBlobStore::from_env();
    let mut subscription = store.subscribe("notes").await?;

    loop {
        let snapshot = subscription.recv().await?;
        println!("--- {} note(s) ---", snapshot.len());
        for document in &snapshot.documents {
            let title = document.fields["title"].as_str().unwrap_or("(untitled)");
            println!("  [{}] {}", document.id, title);
            if let Some(key) = document.fields["attachment_key"].as_str() {
                match blobs.fetchable_location(key).await {
                    Ok(location) => println!("      image: {}", location),
                    Err(e) => println!("      image: unavailable ({})", e),
                }
            }
        }
    }
}
