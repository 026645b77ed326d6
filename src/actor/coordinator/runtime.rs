use crate::actor::fs::FsActor;

use super::SyncCoordinator;

/// Run all actors concurrently.
///
/// The coordinator decides when the system stops. The watcher task is then
/// aborted, which drops the notify handle and releases the watch.
pub(super) async fn run_actors(fs: FsActor, sync: SyncCoordinator) {
    let fs_handle = tokio::spawn(fs.run());

    sync.run().await;

    crate::debug!("actor"; "stopping watcher");
    fs_handle.abort();
    let _ = fs_handle.await;
}
