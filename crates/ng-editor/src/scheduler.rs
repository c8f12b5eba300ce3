//! Debounced snapshot scheduling.
//!
//! Bursts of mutations (every keystroke, every drag frame) collapse into
//! one history push + one autosave write per quiet period. This is a
//! trailing-edge debounce, not a throttle: each new queue resets the
//! timer, so only the final state of a burst is persisted.
//!
//! There is no timer thread. The scheduler records a deadline against an
//! injected `Clock` and the embedding layer drives it by calling
//! `poll(now)` from its own timer or frame callback — which also makes
//! the timing logic testable against a manual clock.

use std::cell::Cell;
use std::time::Instant;

/// Default quiet period before a queued snapshot is committed.
pub const SNAPSHOT_DEBOUNCE_MS: u64 = 300;

/// Monotonic millisecond clock, injectable so tests control time.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock measured from construction.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

/// Hand-cranked clock for tests and deterministic embedding.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

/// Debouncer with explicit batch bracketing.
///
/// While a batch is open, queued snapshots only replace the pending one;
/// the debounce timer starts when the outermost batch closes, so a
/// compound operation lands in history as a single entry.
pub struct SnapshotScheduler<T> {
    debounce_ms: u64,
    pending: Option<T>,
    deadline: Option<u64>,
    batch_depth: u32,
}

impl<T> SnapshotScheduler<T> {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            debounce_ms,
            pending: None,
            deadline: None,
            batch_depth: 0,
        }
    }

    /// Queue a snapshot, restarting the quiet-period timer. Inside a
    /// batch the snapshot is buffered without scheduling.
    pub fn queue(&mut self, snapshot: T, now_ms: u64) {
        self.pending = Some(snapshot);
        if self.batch_depth == 0 {
            self.deadline = Some(now_ms + self.debounce_ms);
        } else {
            self.deadline = None;
        }
    }

    /// Open a batch. Nested batches are counted; only the outermost
    /// close schedules.
    pub fn begin_batch(&mut self) {
        self.batch_depth += 1;
        self.deadline = None;
    }

    /// Close a batch. When the outermost batch closes with a buffered
    /// snapshot, that snapshot is scheduled as if freshly queued.
    pub fn end_batch(&mut self, now_ms: u64) {
        if self.batch_depth == 0 {
            return;
        }
        self.batch_depth -= 1;
        if self.batch_depth == 0 && self.pending.is_some() {
            self.deadline = Some(now_ms + self.debounce_ms);
        }
    }

    /// Take the pending snapshot if its quiet period has elapsed.
    pub fn poll(&mut self, now_ms: u64) -> Option<T> {
        match self.deadline {
            Some(deadline) if now_ms >= deadline => {
                self.deadline = None;
                self.pending.take()
            }
            _ => None,
        }
    }

    /// Drop any pending snapshot and timer (teardown, or discarding a
    /// burst that should not reach history).
    pub fn cancel(&mut self) {
        self.pending = None;
        self.deadline = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn in_batch(&self) -> bool {
        self.batch_depth > 0
    }
}

impl<T> Default for SnapshotScheduler<T> {
    fn default() -> Self {
        Self::new(SNAPSHOT_DEBOUNCE_MS)
    }
}
