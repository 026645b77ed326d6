//! Actor Message Definitions
//!
//! Every producer talks to the Sync Coordinator through one typed queue:
//!
//! ```text
//! FsActor ------Changed/Unreadable/WatchError--+
//! acceptor -----ViewerConnected----------------+--> SyncCoordinator
//! Ctrl+C -------Shutdown-----------------------+
//! ```

use std::path::PathBuf;

use super::ws::ViewerSocket;

/// Messages to the Sync Coordinator
pub enum SyncEvent {
    /// The watched document was written
    Changed(PathBuf),
    /// The watched document disappeared or cannot be read
    Unreadable(PathBuf),
    /// The watch mechanism reported an error unrelated to the file
    WatchError(String),
    /// A viewer finished the live-socket handshake
    ViewerConnected(Box<dyn ViewerSocket>),
    /// Stop the actor system
    Shutdown,
}

impl SyncEvent {
    /// Short name for debug logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Changed(_) => "changed",
            Self::Unreadable(_) => "unreadable",
            Self::WatchError(_) => "watch-error",
            Self::ViewerConnected(_) => "viewer-connected",
            Self::Shutdown => "shutdown",
        }
    }
}
