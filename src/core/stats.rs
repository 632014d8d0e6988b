//! Throttler statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time statistics of a throttler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThrottlerStats {
    /// Tasks waiting in the queue.
    pub queued: usize,

    /// Tasks dispatched whose outcome has not been delivered yet.
    pub in_flight: u64,

    /// Total tasks submitted.
    pub submitted: u64,

    /// Total tasks dispatched for execution.
    pub dispatched: u64,

    /// Handles settled with a value.
    pub completed: u64,

    /// Handles settled with an error, including batch-wide rejections.
    pub failed: u64,

    /// Drain cycles that dispatched at least one task.
    pub units: u64,
}

/// Internal counters for throttler statistics (thread-safe).
#[derive(Debug, Default)]
pub(crate) struct ThrottlerCounters {
    in_flight: AtomicU64,
    submitted: AtomicU64,
    dispatched: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    units: AtomicU64,
}

impl ThrottlerCounters {
    pub(crate) fn on_submit(&self) {
        self.submitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one drain unit dispatching `count` tasks.
    pub(crate) fn on_dispatch(&self, count: usize) {
        let count = count as u64;
        self.units.fetch_add(1, Ordering::Relaxed);
        self.dispatched.fetch_add(count, Ordering::Relaxed);
        self.in_flight.fetch_add(count, Ordering::Relaxed);
    }

    /// Record `count` handles settled with the same kind of outcome.
    pub(crate) fn on_settled(&self, count: usize, ok: bool) {
        let count = count as u64;
        self.in_flight.fetch_sub(count, Ordering::Relaxed);
        if ok {
            self.completed.fetch_add(count, Ordering::Relaxed);
        } else {
            self.failed.fetch_add(count, Ordering::Relaxed);
        }
    }

    /// Get a snapshot of current statistics.
    pub(crate) fn snapshot(&self, queued: usize) -> ThrottlerStats {
        ThrottlerStats {
            queued,
            in_flight: self.in_flight.load(Ordering::Relaxed),
            submitted: self.submitted.load(Ordering::Relaxed),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            units: self.units.load(Ordering::Relaxed),
        }
    }
}
