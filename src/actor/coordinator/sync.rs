use std::path::Path;
use std::time::Duration;

use tokio::sync::mpsc;

use super::coalesce::Coalescer;
use crate::actor::messages::SyncEvent;
use crate::actor::ws::ViewerRegistry;
use crate::logger::{status_error, status_success, status_warning};
use crate::reload::message::Signal;
use crate::utils::plural::plural_count;

/// Where the coordinator is in its change cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// No change pending
    Idle,
    /// Broadcast in flight
    Notifying,
    /// Waiting for the coalescing window to go quiet
    Coalescing,
}

/// Whether the event loop keeps going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Sync Coordinator - turns `changed` signals into reload broadcasts.
///
/// Every event producer enqueues a [`SyncEvent`]; this actor is the only
/// consumer, so the state machine is driven from one place.
pub struct SyncCoordinator {
    rx: mpsc::Receiver<SyncEvent>,
    registry: ViewerRegistry,
    /// Display name of the document for status lines
    file_name: String,
    state: SyncState,
    coalescer: Coalescer,
}

impl SyncCoordinator {
    pub fn new(
        rx: mpsc::Receiver<SyncEvent>,
        registry: ViewerRegistry,
        document: &Path,
        window: Duration,
    ) -> Self {
        let file_name = document
            .file_name()
            .map_or_else(|| document.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self {
            rx,
            registry,
            file_name,
            state: SyncState::Idle,
            coalescer: Coalescer::new(window),
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Apply one event to the state machine.
    pub fn handle(&mut self, event: SyncEvent) -> Flow {
        crate::debug!("sync"; "event: {} (state: {:?})", event.kind(), self.state);
        match event {
            SyncEvent::Changed(path) => {
                crate::debug!("sync"; "{} written", path.display());
                if self.coalescer.is_enabled() {
                    self.coalescer.add();
                    self.state = SyncState::Coalescing;
                } else {
                    self.notify(1);
                }
            }
            SyncEvent::Unreadable(path) => {
                status_error(
                    &format!("cannot read {}", self.file_name),
                    &format!("{} is missing, waiting for it to reappear", path.display()),
                );
            }
            SyncEvent::WatchError(error) => status_warning(&format!("watch error: {error}")),
            SyncEvent::ViewerConnected(socket) => {
                self.registry.register(socket);
            }
            SyncEvent::Shutdown => return Flow::Stop,
        }
        Flow::Continue
    }

    /// Flush a coalesced broadcast if its window has gone quiet.
    pub fn flush_ready(&mut self) {
        if let Some(folded) = self.coalescer.take_if_ready() {
            self.notify(folded);
        }
    }

    /// IDLE → NOTIFYING → IDLE around one broadcast.
    fn notify(&mut self, folded: usize) {
        self.state = SyncState::Notifying;
        let report = self.registry.broadcast(Signal::Reload);
        self.state = SyncState::Idle;

        let mut message = format!(
            "{} changed, {} notified",
            self.file_name,
            plural_count(report.delivered, "viewer")
        );
        if folded > 1 {
            message.push_str(&format!(" ({folded} changes)"));
        }
        if report.dropped > 0 {
            message.push_str(&format!(", {} dropped", report.dropped));
        }
        status_success(&message);
    }

    /// Run the actor event loop until shutdown, then close every viewer.
    pub async fn run(mut self) {
        loop {
            let sleep = self.coalescer.sleep_duration();
            let pending = self.coalescer.is_pending();

            tokio::select! {
                biased;
                received = self.rx.recv() => {
                    let Some(event) = received else { break };
                    if self.handle(event) == Flow::Stop {
                        break;
                    }
                }
                _ = tokio::time::sleep(sleep), if pending => self.flush_ready(),
            }
        }

        crate::debug!("sync"; "shutting down");
        self.registry.close_all();
    }
}
