//! Batch completion countdown
//!
//! Every input URL accounts for exactly one unit of work. Invalid and
//! duplicate inputs settle their unit immediately; admitted inputs settle it
//! through the fetch-failure path or the engine's completion callback. The
//! batch report waits until the countdown reaches zero.

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

/// Countdown latch tracking outstanding units of batch work
#[derive(Debug, Default)]
pub struct BatchCompletion {
    remaining: AtomicUsize,
    notify: Notify,
}

impl BatchCompletion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `n` additional units of outstanding work
    pub fn add(&self, n: usize) {
        self.remaining.fetch_add(n, Ordering::AcqRel);
    }

    /// Settles one unit of work
    ///
    /// Must be called exactly once per registered unit, on every exit path.
    pub fn done(&self) {
        let prev = self.remaining.fetch_sub(1, Ordering::AcqRel);
        assert!(prev > 0, "completion countdown went negative");
        if prev == 1 {
            self.notify.notify_waiters();
        }
    }

    /// Returns the number of unsettled units
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    /// Waits until every registered unit has been settled
    pub async fn wait(&self) {
        loop {
            if self.remaining() == 0 {
                return;
            }
            let notified = self.notify.notified();
            // Re-check after registering interest so a done() racing with
            // the first check cannot be missed.
            if self.remaining() == 0 {
                return;
            }
            notified.await;
        }
    }
}
