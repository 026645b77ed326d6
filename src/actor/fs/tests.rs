use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::EventKind;
use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind, ModifyKind, RemoveKind, RenameMode};
use tempfile::TempDir;
use tokio::sync::mpsc;

use super::FsActor;
use super::classifier::EventClassifier;
use super::types::PathChange;
use crate::actor::messages::SyncEvent;
use crate::utils::path::normalize_path;

fn make_doc(content: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("docs.md");
    std::fs::write(&path, content).unwrap();
    (temp, normalize_path(&path))
}

fn make_event(paths: Vec<&Path>, kind: EventKind) -> notify::Event {
    notify::Event {
        kind,
        paths: paths.into_iter().map(Path::to_path_buf).collect(),
        attrs: Default::default(),
    }
}

fn modify_kind() -> EventKind {
    EventKind::Modify(ModifyKind::Data(DataChange::Any))
}

// =============================================================================
// Classifier
// =============================================================================

#[test]
fn test_modify_is_changed() {
    let (_temp, doc) = make_doc("# A");
    let event = make_event(vec![&doc], modify_kind());
    assert_eq!(EventClassifier::classify(&event, &doc), Some(PathChange::Changed));

    let event = make_event(vec![&doc], EventKind::Modify(ModifyKind::Any));
    assert_eq!(EventClassifier::classify(&event, &doc), Some(PathChange::Changed));
}

#[test]
fn test_create_is_changed() {
    let (_temp, doc) = make_doc("# A");
    let event = make_event(vec![&doc], EventKind::Create(CreateKind::File));
    assert_eq!(EventClassifier::classify(&event, &doc), Some(PathChange::Changed));
}

#[test]
fn test_metadata_and_access_ignored() {
    let (_temp, doc) = make_doc("# A");
    let metadata = make_event(
        vec![&doc],
        EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)),
    );
    let access = make_event(vec![&doc], EventKind::Access(AccessKind::Any));

    assert_eq!(EventClassifier::classify(&metadata, &doc), None);
    assert_eq!(EventClassifier::classify(&access, &doc), None);
}

#[test]
fn test_sibling_file_ignored() {
    let (temp, doc) = make_doc("# A");
    let sibling = temp.path().join("other.md");
    let event = make_event(vec![&sibling], modify_kind());
    assert_eq!(EventClassifier::classify(&event, &doc), None);
}

#[test]
fn test_remove_of_missing_file_is_vanished() {
    let (_temp, doc) = make_doc("# A");
    std::fs::remove_file(&doc).unwrap();

    let event = make_event(vec![&doc], EventKind::Remove(RemoveKind::File));
    assert_eq!(EventClassifier::classify(&event, &doc), Some(PathChange::Vanished));
}

#[test]
fn test_remove_of_existing_file_is_changed() {
    // Atomic save: the remove arrives after the replacement already exists
    let (_temp, doc) = make_doc("# A");
    let event = make_event(vec![&doc], EventKind::Remove(RemoveKind::File));
    assert_eq!(EventClassifier::classify(&event, &doc), Some(PathChange::Changed));
}

#[test]
fn test_late_modify_of_missing_file_is_vanished() {
    let (_temp, doc) = make_doc("# A");
    std::fs::remove_file(&doc).unwrap();

    let event = make_event(vec![&doc], modify_kind());
    assert_eq!(EventClassifier::classify(&event, &doc), Some(PathChange::Vanished));
}

#[test]
fn test_rename_onto_target_is_changed() {
    let (temp, doc) = make_doc("# A");
    let swap = temp.path().join(".docs.md.swp");

    let both = make_event(
        vec![&swap, &doc],
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
    );
    assert_eq!(EventClassifier::classify(&both, &doc), Some(PathChange::Changed));

    let to = make_event(vec![&doc], EventKind::Modify(ModifyKind::Name(RenameMode::To)));
    assert_eq!(EventClassifier::classify(&to, &doc), Some(PathChange::Changed));
}

#[test]
fn test_rename_away_is_vanished() {
    let (temp, doc) = make_doc("# A");
    let moved = temp.path().join("moved.md");
    std::fs::rename(&doc, &moved).unwrap();

    let both = make_event(
        vec![&doc, &moved],
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
    );
    assert_eq!(EventClassifier::classify(&both, &doc), Some(PathChange::Vanished));
}

// =============================================================================
// Actor (real watcher)
// =============================================================================

const WAIT: Duration = Duration::from_secs(5);

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

/// Receive until an event matches `want` or the deadline passes.
async fn wait_for(rx: &mut mpsc::Receiver<SyncEvent>, want: impl Fn(&SyncEvent) -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + WAIT;
    loop {
        match tokio::time::timeout_at(deadline, rx.recv()).await {
            Ok(Some(event)) if want(&event) => return true,
            Ok(Some(_)) => continue,
            Ok(None) | Err(_) => return false,
        }
    }
}

#[test]
fn test_no_event_at_startup_then_changed_on_write() {
    let (_temp, doc) = make_doc("# Hello");

    runtime().block_on(async {
        let (tx, mut rx) = mpsc::channel(16);
        let actor = FsActor::new(&doc, tx).unwrap();
        let handle = tokio::spawn(actor.run());

        let quiet = tokio::time::timeout(Duration::from_millis(300), rx.recv()).await;
        assert!(quiet.is_err(), "watcher fired at startup");

        std::fs::write(&doc, "# Hello\n\nWorld").unwrap();
        assert!(wait_for(&mut rx, |e| matches!(e, SyncEvent::Changed(p) if *p == doc)).await);

        handle.abort();
    });
}

#[test]
fn test_sibling_write_does_not_fire() {
    let (temp, doc) = make_doc("# Hello");

    runtime().block_on(async {
        let (tx, mut rx) = mpsc::channel(16);
        let handle = tokio::spawn(FsActor::new(&doc, tx).unwrap().run());

        std::fs::write(temp.path().join("other.md"), "noise").unwrap();
        let quiet = tokio::time::timeout(Duration::from_millis(500), rx.recv()).await;
        assert!(quiet.is_err());

        handle.abort();
    });
}

#[test]
fn test_survives_delete_and_recreate() {
    let (_temp, doc) = make_doc("# Hello");

    runtime().block_on(async {
        let (tx, mut rx) = mpsc::channel(16);
        let handle = tokio::spawn(FsActor::new(&doc, tx).unwrap().run());

        std::fs::remove_file(&doc).unwrap();
        assert!(wait_for(&mut rx, |e| matches!(e, SyncEvent::Unreadable(_))).await);

        std::fs::write(&doc, "# Back").unwrap();
        std::fs::write(&doc, "# Back\n\nAgain").unwrap();
        assert!(wait_for(&mut rx, |e| matches!(e, SyncEvent::Changed(_))).await);

        handle.abort();
    });
}

#[test]
fn test_stops_when_coordinator_gone() {
    let (_temp, doc) = make_doc("# Hello");

    runtime().block_on(async {
        let (tx, rx) = mpsc::channel(16);
        let handle = tokio::spawn(FsActor::new(&doc, tx).unwrap().run());
        drop(rx);

        std::fs::write(&doc, "# Changed").unwrap();
        assert!(tokio::time::timeout(WAIT, handle).await.is_ok());
    });
}
