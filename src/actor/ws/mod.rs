//! Viewer Registry - the set of live viewer connections.
//!
//! The only shared mutable state of the process. The coordinator registers
//! and broadcasts, the poller thread unregisters closed transports, shutdown
//! drains.
//!
//! ```text
//! acceptor --ViewerConnected--> SyncCoordinator --register/broadcast--> ViewerRegistry
//!                                                                          ^
//!                                          poller --poll_incoming----------+
//! ```
//!
//! Every operation takes the registry lock for its whole duration, so a
//! broadcast always walks one stable membership snapshot.

mod socket;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::reload::message::Signal;

pub use socket::{PollOutcome, ViewerSocket};

/// Opaque handle of a registered viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Connection liveness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Open,
    Closing,
    Closed,
}

struct ViewerConnection {
    id: ConnectionId,
    socket: Box<dyn ViewerSocket>,
    liveness: Liveness,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    viewers: Vec<ViewerConnection>,
}

/// Outcome of a broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    pub delivered: usize,
    pub dropped: usize,
}

/// Shared handle to the viewer set. Clones refer to the same set.
#[derive(Clone, Default)]
pub struct ViewerRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl ViewerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection in the OPEN state.
    pub fn register(&self, socket: Box<dyn ViewerSocket>) -> ConnectionId {
        let mut registry = self.inner.lock();
        let id = ConnectionId(registry.next_id);
        registry.next_id += 1;
        registry.viewers.push(ViewerConnection {
            id,
            socket,
            liveness: Liveness::Open,
        });
        crate::debug!("ws"; "viewer {} connected (total: {})", id, registry.viewers.len());
        id
    }

    /// Remove a connection. Returns `false` if it was already gone.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        let mut registry = self.inner.lock();
        let before = registry.viewers.len();
        registry.viewers.retain(|viewer| viewer.id != id);
        let removed = registry.viewers.len() != before;
        if removed {
            crate::debug!("ws"; "viewer {} disconnected (total: {})", id, registry.viewers.len());
        }
        removed
    }

    /// Deliver `signal` to every OPEN connection.
    ///
    /// Connections in any other state are skipped. A failed delivery never
    /// propagates; the connection is removed instead.
    pub fn broadcast(&self, signal: Signal) -> BroadcastReport {
        let mut registry = self.inner.lock();
        let mut report = BroadcastReport::default();

        registry.viewers.retain_mut(|viewer| {
            if viewer.liveness != Liveness::Open {
                return true;
            }
            match viewer.socket.deliver(signal) {
                Ok(()) => {
                    report.delivered += 1;
                    true
                }
                Err(e) => {
                    crate::debug!("ws"; "dropping viewer {}: {}", viewer.id, e);
                    viewer.liveness = Liveness::Closed;
                    report.dropped += 1;
                    false
                }
            }
        });

        crate::debug!("ws"; "broadcast {} to {} viewers", signal, report.delivered);
        report
    }

    /// Read once from every connection without blocking.
    ///
    /// Viewer payloads are ignored. A close frame moves the connection to
    /// CLOSING, a closed transport is unregistered. Returns the number
    /// removed.
    pub fn poll_incoming(&self) -> usize {
        let closed: Vec<ConnectionId> = {
            let mut registry = self.inner.lock();
            registry
                .viewers
                .iter_mut()
                .filter_map(|viewer| match viewer.socket.poll() {
                    PollOutcome::Idle | PollOutcome::Message => None,
                    PollOutcome::CloseRequested => {
                        viewer.liveness = Liveness::Closing;
                        None
                    }
                    PollOutcome::Closed => {
                        viewer.liveness = Liveness::Closed;
                        Some(viewer.id)
                    }
                })
                .collect()
        };

        closed.into_iter().filter(|&id| self.unregister(id)).count()
    }

    /// Close every connection and empty the registry.
    pub fn close_all(&self) -> usize {
        let mut registry = self.inner.lock();
        let count = registry.viewers.len();
        for mut viewer in registry.viewers.drain(..) {
            viewer.liveness = Liveness::Closing;
            viewer.socket.begin_close();
            viewer.liveness = Liveness::Closed;
        }
        if count > 0 {
            crate::debug!("ws"; "closed {} viewer connections", count);
        }
        count
    }

    /// Liveness of a registered connection, `None` once removed.
    #[cfg(test)]
    pub fn liveness(&self, id: ConnectionId) -> Option<Liveness> {
        let registry = self.inner.lock();
        registry
            .viewers
            .iter()
            .find(|viewer| viewer.id == id)
            .map(|viewer| viewer.liveness)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.lock().viewers.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
