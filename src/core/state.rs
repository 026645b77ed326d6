//! Shutdown state shared between the request loop, the live-socket threads
//! and the Ctrl+C handler.
//!
//! Two views of the same event:
//! - an atomic flag, cheap to check per request
//! - a crossbeam channel whose sender is dropped on shutdown, so blocking
//!   threads can sleep on it and wake immediately

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use parking_lot::Mutex;

/// Cloneable shutdown handle. All clones observe the same trigger.
#[derive(Clone)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
    /// Dropped on trigger; every receiver then sees `Disconnected`.
    tx: Arc<Mutex<Option<Sender<()>>>>,
    rx: Receiver<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, rx) = channel::bounded(0);
        Self {
            requested: Arc::new(AtomicBool::new(false)),
            tx: Arc::new(Mutex::new(Some(tx))),
            rx,
        }
    }

    /// Request shutdown. Returns `true` only for the first call.
    pub fn trigger(&self) -> bool {
        let first = !self.requested.swap(true, Ordering::SeqCst);
        self.tx.lock().take();
        first
    }

    /// Check if shutdown has been requested
    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Sleep up to `timeout`, waking early on shutdown.
    ///
    /// Returns `true` if shutdown has been requested.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Err(RecvTimeoutError::Disconnected) => true,
            Ok(()) | Err(RecvTimeoutError::Timeout) => self.is_requested(),
        }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
