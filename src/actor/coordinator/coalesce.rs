use std::time::{Duration, Instant};

/// Collapses `changed` signals that arrive within a quiet window.
///
/// Pure timing, no I/O. A zero window disables coalescing and the
/// coordinator broadcasts once per signal.
pub(super) struct Coalescer {
    window: Duration,
    /// Signals folded into the next broadcast
    pending: usize,
    last_event: Option<Instant>,
}

impl Coalescer {
    pub(super) fn new(window: Duration) -> Self {
        Self {
            window,
            pending: 0,
            last_event: None,
        }
    }

    pub(super) fn is_enabled(&self) -> bool {
        !self.window.is_zero()
    }

    pub(super) fn add(&mut self) {
        self.pending += 1;
        self.last_event = Some(Instant::now());
    }

    pub(super) fn is_pending(&self) -> bool {
        self.pending > 0
    }

    pub(super) fn is_ready(&self) -> bool {
        let Some(last_event) = self.last_event else {
            return false;
        };
        self.pending > 0 && last_event.elapsed() >= self.window
    }

    /// Take the number of folded signals once the window has been quiet.
    pub(super) fn take_if_ready(&mut self) -> Option<usize> {
        if !self.is_ready() {
            return None;
        }
        self.last_event = None;
        Some(std::mem::take(&mut self.pending))
    }

    /// Precise sleep duration until the window closes.
    pub(super) fn sleep_duration(&self) -> Duration {
        let Some(last_event) = self.last_event else {
            return Duration::from_secs(86400);
        };
        self.window
            .saturating_sub(last_event.elapsed())
            .max(Duration::from_millis(1))
    }
}
