//! FileSystem Actor
//!
//! Watches the single document and sends one `Changed` per write to the
//! Sync Coordinator. No debouncing happens here.
//!
//! Architecture:
//! ```text
//! notify (parent dir) → bridge thread → Classifier (exact path) → SyncEvent
//! ```

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use notify::RecommendedWatcher;
use tokio::sync::mpsc;

use super::messages::SyncEvent;

// Raw notify event -> change of the watched path.
mod classifier;
// Shared fs event types.
mod types;
// Parent directory attach/re-attach lifecycle.
mod watch_roots;

#[cfg(test)]
mod tests;

use classifier::EventClassifier;
use types::PathChange;
use watch_roots::WatchRoot;

/// How often the watched directory is checked for re-attachment.
const MAINTAIN_INTERVAL: Duration = Duration::from_secs(1);

/// FileSystem Actor - watches the document for changes
pub struct FsActor {
    /// Absolute path of the document
    target: PathBuf,
    /// Channel to receive notify events (sync -> async bridge)
    notify_rx: Receiver<notify::Result<notify::Event>>,
    /// Watcher handle (dropping it releases the watch)
    watcher: RecommendedWatcher,
    watch_root: WatchRoot,
    /// Channel to the Sync Coordinator
    sync_tx: mpsc::Sender<SyncEvent>,
}

impl FsActor {
    /// Start watching `target`.
    ///
    /// Anything notify queued while the watch was being set up is drained
    /// before returning, so startup never produces a `Changed`.
    pub fn new(target: &Path, sync_tx: mpsc::Sender<SyncEvent>) -> notify::Result<Self> {
        let (notify_tx, notify_rx) = std::sync::mpsc::channel();

        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = notify_tx.send(res);
        })?;

        let dir = target
            .parent()
            .map_or_else(|| PathBuf::from("/"), Path::to_path_buf);
        let mut watch_root = WatchRoot::new(dir);
        watch_root.attach(&mut watcher)?;

        let discarded = notify_rx.try_iter().count();
        if discarded > 0 {
            crate::debug!("watch"; "discarded {} startup events", discarded);
        }

        Ok(Self {
            target: target.to_path_buf(),
            notify_rx,
            watcher,
            watch_root,
            sync_tx,
        })
    }

    /// Run the actor event loop until the coordinator goes away.
    pub async fn run(self) {
        let Self {
            target,
            notify_rx,
            mut watcher,
            mut watch_root,
            sync_tx,
        } = self;

        let (async_tx, mut async_rx) =
            mpsc::channel::<notify::Result<notify::Event>>(64);

        // Ends when the watcher (and with it the notify sender) is dropped
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                if async_tx.blocking_send(result).is_err() {
                    break; // Receiver dropped
                }
            }
        });

        let mut maintain = tokio::time::interval(MAINTAIN_INTERVAL);
        loop {
            tokio::select! {
                biased;
                received = async_rx.recv() => {
                    let Some(result) = received else { break };
                    if forward(result, &target, &sync_tx).await.is_err() {
                        break;
                    }
                }
                _ = maintain.tick() => watch_root.maintain(&mut watcher),
            }
        }

        crate::debug!("watch"; "stopped");
    }
}

/// Translate one notify result into a coordinator event.
///
/// Returns `Err(())` if the coordinator shut down.
async fn forward(
    result: notify::Result<notify::Event>,
    target: &Path,
    sync_tx: &mpsc::Sender<SyncEvent>,
) -> Result<(), ()> {
    let event = match result {
        Ok(event) => event,
        Err(e) => {
            return sync_tx
                .send(SyncEvent::WatchError(e.to_string()))
                .await
                .map_err(|_| ());
        }
    };

    let Some(change) = EventClassifier::classify(&event, target) else {
        return Ok(());
    };
    crate::debug!("watch"; "{} ({:?}): {}", change.label(), event.kind, target.display());

    let message = match change {
        PathChange::Changed => SyncEvent::Changed(target.to_path_buf()),
        PathChange::Vanished => SyncEvent::Unreadable(target.to_path_buf()),
    };
    sync_tx.send(message).await.map_err(|_| ())
}
