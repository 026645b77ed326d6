//! Actor System for Live Sync
//!
//! Message-passing concurrency for watch mode:
//!
//! ```text
//! FsActor --SyncEvent--> SyncCoordinator --Reload--> ViewerRegistry
//! (watch)                 (state machine)            (broadcast)
//! ```
//!
//! # Module Structure
//!
//! - `messages` - Event type consumed by the coordinator
//! - `fs` - File watcher for the single document
//! - `ws` - Viewer connections and broadcast
//! - `coordinator` - Sync state machine, wires up and runs actors

pub mod coordinator;
pub mod fs;
pub mod messages;
pub mod ws;

pub use coordinator::Coordinator;
