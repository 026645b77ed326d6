//! Live reload for the viewer page.
//!
//! ```text
//! FsActor --Changed--> SyncCoordinator --Reload--> ViewerRegistry --> Browser
//!                            ^
//!                            +--ViewerConnected-- live socket acceptor
//! ```
//!
//! - `message` - the wire token
//! - `server` - live socket listener, acceptor and read poller

pub mod message;
pub mod server;
