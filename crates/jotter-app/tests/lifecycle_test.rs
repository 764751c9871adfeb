//! End-to-end note lifecycle tests against the in-memory backends.
//!
//! These drive the screen flows the way a UI would: draft, pick an image,
//! submit, watch the list re-render, edit, delete. The in-memory stores
//! record every backend call, so the tests can also assert what was NOT
//! sent.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;

use jotter_app::memory::{BlobOp, StoreOp};
use jotter_app::{
    AttachmentGateway, BlobStore, CreateState, EditState, FetchableLocation, ListState,
    MemoryBlobStore, MemoryDocumentStore, NoteId, NoteStoreGateway, Notebook, PickedImage,
    Result, StubImageSource, SubmitOutcome,
};

const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn notebook() -> (Notebook, MemoryDocumentStore, MemoryBlobStore) {
    let documents = MemoryDocumentStore::new();
    let blobs = MemoryBlobStore::new();
    let notebook = Notebook::new(Arc::new(documents.clone()), Arc::new(blobs.clone()));
    (notebook, documents, blobs)
}

fn png_image() -> PickedImage {
    PickedImage {
        file_name: "photo.png".to_string(),
        content_type: "image/png".to_string(),
        data: PNG_MAGIC.to_vec(),
    }
}

fn image_source_with_one_png() -> StubImageSource {
    let source = StubImageSource::new();
    source.push_image(png_image());
    source
}

/// Blob store that dawdles inside `put` and records when the upload actually
/// returned. Lets tests order upload completion against document-store calls.
struct SlowBlobStore {
    inner: MemoryBlobStore,
    put_finished: Arc<Mutex<Option<Instant>>>,
}

impl SlowBlobStore {
    fn new() -> Self {
        Self {
            inner: MemoryBlobStore::new(),
            put_finished: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl BlobStore for SlowBlobStore {
    async fn put(&self, key: &str, data: &[u8], content_type: &str) -> Result<()> {
        tokio::time::sleep(Duration::from_millis(25)).await;
        let result = self.inner.put(key, data, content_type).await;
        *self.put_finished.lock().unwrap() = Some(Instant::now());
        result
    }

    async fn fetchable_location(&self, key: &str) -> Result<FetchableLocation> {
        self.inner.fetchable_location(key).await
    }
}

#[tokio::test]
async fn test_created_note_appears_in_list_exactly_once() {
    let (notebook, _documents, _blobs) = notebook();

    let mut create = notebook.create();
    create.set_title("Groceries");
    create.set_body("Milk, eggs");
    let outcome = create.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Saved(_)));

    let mut list = notebook.list().await;
    assert_eq!(*list.state(), ListState::Loading);
    list.next().await;

    let groceries: Vec<_> = list
        .notes()
        .iter()
        .filter(|n| n.title == "Groceries")
        .collect();
    assert_eq!(groceries.len(), 1);
    assert_eq!(list.rows(), vec!["Groceries...".to_string()]);
}

#[tokio::test]
async fn test_notebook_gateways_work_standalone() {
    let (notebook, documents, blobs) = notebook();

    // The aggregate exposes its gateways; callers can drive them directly.
    let notes: &NoteStoreGateway = &notebook.notes;
    let attachments: &AttachmentGateway = &notebook.attachments;

    let attachment = attachments.upload(&png_image()).await.unwrap();
    let location = attachments.resolve(&attachment).await.unwrap();
    assert!(location.url.ends_with(attachment.key()));

    let id = notes
        .create("Direct", "through the gateway", Some(&attachment))
        .await
        .unwrap();
    assert_eq!(documents.documents("notes")[0].id, id.as_str());
    assert!(blobs.contains(attachment.key()));
}

#[tokio::test]
async fn test_empty_fields_never_reach_the_store() {
    let (notebook, documents, blobs) = notebook();

    let mut create = notebook.create();
    create.set_title("Only a title");
    let outcome = create.submit().await;

    assert_eq!(outcome, SubmitOutcome::Skipped);
    assert_eq!(*create.state(), CreateState::Editing);
    assert_eq!(documents.create_count(), 0);
    assert_eq!(blobs.put_count(), 0);

    create.set_title("");
    create.set_body("Only a body");
    assert_eq!(create.submit().await, SubmitOutcome::Skipped);
    assert_eq!(documents.create_count(), 0);
}

#[tokio::test]
async fn test_whitespace_only_fields_still_save() {
    // Validation checks for empty strings, not blank ones.
    let (notebook, documents, _blobs) = notebook();

    let mut create = notebook.create();
    create.set_title("   ");
    create.set_body("Milk");
    let outcome = create.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Saved(_)));
    assert_eq!(documents.create_count(), 1);
}

#[tokio::test]
async fn test_note_references_image_only_after_upload_completes() {
    let (notebook, documents, blobs) = notebook();

    let mut create = notebook.create();
    create.set_title("Trip");
    create.set_body("Photos");
    let source = image_source_with_one_png();
    create.pick_image(&source).await;

    let outcome = create.submit().await;
    let id = match outcome {
        SubmitOutcome::Saved(id) => id,
        other => panic!("expected save, got {:?}", other),
    };

    // The upload was issued before the create.
    let put = blobs
        .calls()
        .into_iter()
        .find(|c| c.op == BlobOp::Put)
        .expect("no blob upload recorded");
    let created = documents
        .calls()
        .into_iter()
        .find(|c| c.op == StoreOp::Create)
        .expect("no note create recorded");
    assert!(put.at <= created.at, "create started before the upload");

    // The stored note points at the uploaded blob.
    let docs = documents.documents("notes");
    assert_eq!(docs[0].id, id.as_str());
    let key = docs[0].fields["attachment_key"].as_str().unwrap();
    assert!(blobs.contains(key));
}

#[tokio::test]
async fn test_upload_finishes_before_create_begins() {
    let documents = MemoryDocumentStore::new();
    let blobs = SlowBlobStore::new();
    let put_finished = Arc::clone(&blobs.put_finished);
    let notebook = Notebook::new(Arc::new(documents.clone()), Arc::new(blobs));

    let mut create = notebook.create();
    create.set_title("Trip");
    create.set_body("Photos");
    let source = image_source_with_one_png();
    create.pick_image(&source).await;

    let id: NoteId = match create.submit().await {
        SubmitOutcome::Saved(id) => id,
        other => panic!("expected save, got {:?}", other),
    };

    // The slow put returned before the store saw the create, so the note was
    // held back until the upload completed rather than merely started.
    let finished = put_finished
        .lock()
        .unwrap()
        .expect("no upload completion recorded");
    let created = documents
        .calls()
        .into_iter()
        .find(|c| c.op == StoreOp::Create)
        .expect("no note create recorded");
    assert!(finished <= created.at, "create began before the upload returned");
    assert_eq!(documents.documents("notes")[0].id, id.as_str());
}

#[tokio::test]
async fn test_note_without_image_has_no_attachment() {
    let (notebook, documents, blobs) = notebook();

    let mut create = notebook.create();
    create.set_title("Plain");
    create.set_body("No image here");
    create.submit().await;

    assert_eq!(blobs.put_count(), 0);
    let docs = documents.documents("notes");
    assert!(docs[0].fields.get("attachment_key").is_none());
}

#[tokio::test]
async fn test_failed_upload_never_creates_a_note() {
    let (notebook, documents, blobs) = notebook();
    blobs.fail_next_puts(1);

    let mut create = notebook.create();
    create.set_title("Trip");
    create.set_body("Photos");
    let source = image_source_with_one_png();
    create.pick_image(&source).await;

    let outcome = create.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Failed(_)));
    assert!(matches!(create.state(), CreateState::Failed(_)));
    assert_eq!(documents.create_count(), 0);

    // Draft input survives the failure.
    assert_eq!(create.title(), "Trip");
    assert_eq!(create.body(), "Photos");
    assert!(create.image().is_some());
}

#[tokio::test]
async fn test_retry_after_failed_upload_succeeds() {
    let (notebook, documents, blobs) = notebook();
    blobs.fail_next_puts(1);

    let mut create = notebook.create();
    create.set_title("Trip");
    create.set_body("Photos");
    let source = image_source_with_one_png();
    create.pick_image(&source).await;

    assert!(matches!(create.submit().await, SubmitOutcome::Failed(_)));

    // Second attempt, same draft: upload works now.
    let outcome = create.submit().await;
    assert!(matches!(outcome, SubmitOutcome::Saved(_)));
    assert_eq!(documents.create_count(), 1);

    let docs = documents.documents("notes");
    assert_eq!(docs[0].fields["title"], "Trip");
    assert!(docs[0].fields["attachment_key"].is_string());
}

#[tokio::test]
async fn test_failed_create_keeps_draft_for_retry() {
    let (notebook, documents, _blobs) = notebook();
    documents.fail_next_ops(1);

    let mut create = notebook.create();
    create.set_title("Flaky");
    create.set_body("Store is down");

    assert!(matches!(create.submit().await, SubmitOutcome::Failed(_)));
    assert_eq!(create.title(), "Flaky");

    assert!(matches!(create.submit().await, SubmitOutcome::Saved(_)));
    assert_eq!(documents.create_count(), 1);
}

#[tokio::test]
async fn test_submit_after_done_is_skipped() {
    let (notebook, documents, _blobs) = notebook();

    let mut create = notebook.create();
    create.set_title("Once");
    create.set_body("Only once");

    assert!(matches!(create.submit().await, SubmitOutcome::Saved(_)));
    assert_eq!(create.submit().await, SubmitOutcome::Skipped);
    assert_eq!(documents.create_count(), 1);
}

#[tokio::test]
async fn test_cancelled_pick_keeps_current_selection() {
    let (notebook, _documents, _blobs) = notebook();

    let mut create = notebook.create();
    let source = image_source_with_one_png();
    create.pick_image(&source).await;
    assert!(create.image().is_some());

    // Empty queue reads as the user cancelling.
    create.pick_image(&source).await;
    assert!(create.image().is_some());

    // A picker failure is logged and the selection stays too.
    source.push_failure("picker crashed");
    create.pick_image(&source).await;
    assert!(create.image().is_some());

    create.clear_image();
    assert!(create.image().is_none());
}

#[tokio::test]
async fn test_clearing_a_field_makes_save_a_no_op() {
    let (notebook, documents, _blobs) = notebook();
    notebook
        .notes
        .create("Meeting notes", "Agenda items", None)
        .await
        .unwrap();

    let mut list = notebook.list().await;
    list.next().await;
    let note = list.notes()[0].clone();

    let mut edit = notebook.edit(note).await;
    edit.set_title("");
    let outcome = edit.submit().await;

    assert_eq!(outcome, SubmitOutcome::Skipped);
    assert_eq!(*edit.state(), EditState::Viewing);
    assert_eq!(documents.update_count(), 0);

    // The stored note is untouched.
    assert_eq!(documents.documents("notes")[0].fields["title"], "Meeting notes");
}

#[tokio::test]
async fn test_editing_title_and_body_keeps_the_attachment() {
    let (notebook, documents, blobs) = notebook();

    let mut create = notebook.create();
    create.set_title("Trip");
    create.set_body("Photos");
    let source = image_source_with_one_png();
    create.pick_image(&source).await;
    let id = match create.submit().await {
        SubmitOutcome::Saved(id) => id,
        other => panic!("expected save, got {:?}", other),
    };

    let mut list = notebook.list().await;
    list.next().await;
    let note = list
        .notes()
        .iter()
        .find(|n| n.id == id)
        .expect("created note not listed")
        .clone();
    assert!(note.has_attachment());

    let mut edit = notebook.edit(note).await;
    assert!(edit.attachment_location().is_some());
    edit.set_title("Trip 2026");
    edit.set_body("Even more photos");
    let outcome = edit.submit().await;

    assert!(matches!(outcome, SubmitOutcome::Saved(_)));
    assert_eq!(*edit.state(), EditState::Done);

    let fields = &documents.documents("notes")[0].fields;
    assert_eq!(fields["title"], "Trip 2026");
    assert_eq!(fields["body"], "Even more photos");
    let key = fields["attachment_key"].as_str().unwrap();
    assert!(blobs.contains(key));
}

#[tokio::test]
async fn test_edit_screen_resolves_attachment_once() {
    let (notebook, _documents, blobs) = notebook();

    let mut create = notebook.create();
    create.set_title("Trip");
    create.set_body("Photos");
    let source = image_source_with_one_png();
    create.pick_image(&source).await;
    create.submit().await;

    let mut list = notebook.list().await;
    list.next().await;
    let note = list.notes()[0].clone();

    let before = blobs.location_count();
    let edit = notebook.edit(note).await;
    assert_eq!(blobs.location_count(), before + 1);

    // Repeated reads hit the cached location, not the store.
    let first = edit.attachment_location().cloned();
    let second = edit.attachment_location().cloned();
    assert_eq!(first, second);
    assert!(first.is_some());
    assert_eq!(blobs.location_count(), before + 1);
}

#[tokio::test]
async fn test_edit_opens_without_location_when_resolve_fails() {
    let (notebook, documents, blobs) = notebook();

    let mut create = notebook.create();
    create.set_title("Trip");
    create.set_body("Photos");
    let source = image_source_with_one_png();
    create.pick_image(&source).await;
    create.submit().await;

    let mut list = notebook.list().await;
    list.next().await;
    let note = list.notes()[0].clone();

    blobs.fail_next_locations(1);
    let mut edit = notebook.edit(note).await;

    // The screen opens anyway, with an empty image slot.
    assert!(edit.has_attachment());
    assert!(edit.attachment_location().is_none());

    // And it still saves.
    edit.set_body("Photos, eventually");
    assert!(matches!(edit.submit().await, SubmitOutcome::Saved(_)));
    assert_eq!(documents.documents("notes")[0].fields["body"], "Photos, eventually");
}

#[tokio::test]
async fn test_deleted_note_disappears_from_list() {
    let (notebook, _documents, _blobs) = notebook();
    let keep = notebook.notes.create("Keep", "stays", None).await.unwrap();
    let doomed = notebook.notes.create("Doomed", "goes", None).await.unwrap();

    let mut list = notebook.list().await;
    list.next().await;
    assert_eq!(list.notes().len(), 2);

    notebook.delete(&doomed).await.unwrap();

    // The open list re-renders without the deleted note.
    list.next().await;
    assert_eq!(list.notes().len(), 1);
    assert_eq!(list.notes()[0].id, keep);
}

#[tokio::test]
async fn test_open_list_rerenders_on_every_change() {
    let (notebook, _documents, _blobs) = notebook();

    let mut list = notebook.list().await;
    assert!(matches!(list.next().await, ListState::Ready(notes) if notes.is_empty()));

    notebook.notes.create("First", "a", None).await.unwrap();
    list.next().await;
    assert_eq!(list.notes().len(), 1);

    notebook.notes.create("Second", "b", None).await.unwrap();
    list.next().await;
    assert_eq!(list.notes().len(), 2);
    assert_eq!(list.notes()[0].title, "First");
    assert_eq!(list.notes()[1].title, "Second");
}

#[tokio::test]
async fn test_list_opens_in_error_state_when_subscribe_fails() {
    let (notebook, documents, _blobs) = notebook();
    documents.fail_next_subscribes(1);

    let mut list = notebook.list().await;
    assert!(matches!(list.state(), ListState::Error(_)));

    // Error is terminal for this screen.
    assert!(matches!(list.next().await, ListState::Error(_)));
}

#[tokio::test]
async fn test_delete_failure_surfaces_but_list_is_unchanged() {
    let (notebook, documents, _blobs) = notebook();
    let id = notebook.notes.create("Sticky", "still here", None).await.unwrap();

    documents.fail_next_ops(1);
    let result = notebook.delete(&id).await;

    assert!(result.is_err());
    assert_eq!(documents.documents("notes").len(), 1);
}
