use parking_lot::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// A capacity-1 overwrite-on-full handoff cell.
///
/// `put` replaces any unconsumed value, so the consumer only ever observes
/// the freshest data; there is no backlog to drain and stale work is simply
/// never read. Safe for one producer and one consumer running concurrently.
#[derive(Debug)]
pub struct Slot<T> {
    value: Mutex<Option<T>>,
    filled: Condvar,
}

impl<T> Slot<T> {
    pub fn new() -> Self {
        Self {
            value: Mutex::new(None),
            filled: Condvar::new(),
        }
    }

    /// Store `value`, discarding any unconsumed predecessor, and wake a
    /// waiting consumer.
    pub fn put(&self, value: T) {
        *self.value.lock() = Some(value);
        self.filled.notify_one();
    }

    /// Take the held value, leaving the slot empty. Never blocks.
    pub fn try_take(&self) -> Option<T> {
        self.value.lock().take()
    }

    /// Take the held value, waiting up to `timeout` for one to arrive.
    /// Bounded condition-variable wait, not a spin.
    pub fn take_timeout(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut held = self.value.lock();
        loop {
            if let Some(value) = held.take() {
                return Some(value);
            }
            if self.filled.wait_until(&mut held, deadline).timed_out() {
                return held.take();
            }
        }
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::new()
    }
}
