//! Full note lifecycle against the in-memory backends.
//!
//! Creates a note with an image, watches the list update, edits the note,
//! and deletes it.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example quickstart
//!
//! # With debug logging from the gateways
//! RUST_LOG=jotter_store=debug cargo run --example quickstart
//! ```

use std::sync::Arc;

use jotter_app::{
    MemoryBlobStore, MemoryDocumentStore, Notebook, PickedImage, StubImageSource, SubmitOutcome,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "quickstart=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let notebook = Notebook::new(
        Arc::new(MemoryDocumentStore::new()),
        Arc::new(MemoryBlobStore::new()),
    );

    // Draft a note with an image.
    let source = StubImageSource::new();
    source.push_image(PickedImage {
        file_name: "sunset.png".to_string(),
        content_type: "image/png".to_string(),
        data: vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
    });

    let mut create = notebook.create();
    create.set_title("Beach day");
    create.set_body("Sand, waves, one good sunset photo");
    create.pick_image(&source).await;

    let id = match create.submit().await {
        SubmitOutcome::Saved(id) => id,
        other => anyhow::bail!("note was not saved: {:?}", other),
    };
    println!("Created note {}", id);

    // The list sees it.
    let mut list = notebook.list().await;
    list.next().await;
    for row in list.rows() {
        println!("  - {}", row);
    }

    // Open it, show the image location, change the body.
    let note = list.notes()[0].clone();
    let mut edit = notebook.edit(note).await;
    if let Some(location) = edit.attachment_location() {
        println!("Attachment at {}", location);
    }
    edit.set_body("Sand, waves, two good sunset photos");
    match edit.submit().await {
        SubmitOutcome::Saved(_) => println!("Edited note {}", id),
        other => anyhow::bail!("edit did not save: {:?}", other),
    }
    list.next().await;

    // Delete it; the open list re-renders empty.
    notebook.delete(&id).await?;
    list.next().await;
    println!("Notes left after delete: {}", list.notes().len());

    Ok(())
}
