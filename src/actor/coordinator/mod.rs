//! Actor Coordinator - wires up the live sync actors
//!
//! The Coordinator is a thin orchestrator that:
//! - Owns the already-started watcher and the Sync Coordinator
//! - Runs them on a dedicated thread with its own tokio runtime

mod coalesce;
mod runtime;
mod sync;


use std::thread::JoinHandle;

use super::fs::FsActor;

pub use sync::SyncCoordinator;

/// Queue depth between producers and the Sync Coordinator.
pub const CHANNEL_BUFFER: usize = 64;

/// Coordinator - runs the actor system off the main thread.
pub struct Coordinator {
    fs: FsActor,
    sync: SyncCoordinator,
}

impl Coordinator {
    pub fn new(fs: FsActor, sync: SyncCoordinator) -> Self {
        Self { fs, sync }
    }

    /// Spawn the actor thread. Joins once shutdown has been processed.
    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        std::thread::Builder::new()
            .name("mdview-actors".into())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        crate::log!("error"; "failed to create actor runtime: {}", e);
                        return;
                    }
                };

                crate::debug!("actor"; "start");
                rt.block_on(runtime::run_actors(self.fs, self.sync));
                crate::debug!("actor"; "stopped");
            })
    }
}
