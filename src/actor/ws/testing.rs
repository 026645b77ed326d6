//! Socket double shared by registry and coordinator tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::socket::DeliveryError;
use super::{PollOutcome, ViewerSocket};
use crate::reload::message::Signal;

/// Counts deliveries and can be told to fail. Clones share state.
#[derive(Clone, Default)]
pub(crate) struct FakeSocket {
    delivered: Arc<AtomicUsize>,
    closed: Arc<AtomicBool>,
    fail: Arc<AtomicBool>,
    next_poll: Arc<Mutex<Vec<PollOutcome>>>,
}

impl FakeSocket {
    pub(crate) fn delivered(&self) -> usize {
        self.delivered.load(Ordering::SeqCst)
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_from_now(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub(crate) fn queue_poll(&self, outcome: PollOutcome) {
        self.next_poll.lock().push(outcome);
    }

    pub(crate) fn boxed(&self) -> Box<dyn ViewerSocket> {
        Box::new(self.clone())
    }
}

impl ViewerSocket for FakeSocket {
    fn deliver(&mut self, _signal: Signal) -> Result<(), DeliveryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeliveryError::Closed);
        }
        self.delivered.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn poll(&mut self) -> PollOutcome {
        let mut queue = self.next_poll.lock();
        if queue.is_empty() {
            PollOutcome::Idle
        } else {
            queue.remove(0)
        }
    }

    fn begin_close(&mut self) {
        self.closed.store(true, Ordering::SeqCst);
    }
}
