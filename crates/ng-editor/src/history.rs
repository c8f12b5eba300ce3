//! Bounded undo/redo stack over whole-document snapshots.
//!
//! The stack's top entry is the *current* state, so undo needs at least
//! two entries: it moves the top into the redo buffer and returns the new
//! top without removing it. Any push invalidates the redo buffer — the
//! standard linear-undo rule that a fresh edit after undo drops forward
//! history.

use std::collections::VecDeque;

/// Capacity-bounded snapshot stack with a parallel redo buffer.
pub struct HistoryStack<T> {
    stack: VecDeque<T>,
    redo: Vec<T>,
    capacity: usize,
}

impl<T: Clone> HistoryStack<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            stack: VecDeque::with_capacity(capacity),
            redo: Vec::new(),
            capacity,
        }
    }

    /// Append a snapshot, evicting the oldest past capacity and clearing
    /// the redo buffer.
    pub fn push(&mut self, state: T) {
        self.stack.push_back(state);
        if self.stack.len() > self.capacity {
            self.stack.pop_front();
        }
        self.redo.clear();
    }

    /// Step back one snapshot. Returns the state to restore, or `None`
    /// when there is nothing older than the current state.
    pub fn undo(&mut self) -> Option<T> {
        if self.stack.len() <= 1 {
            return None;
        }
        let current = self.stack.pop_back()?;
        self.redo.push(current);
        self.stack.back().cloned()
    }

    /// Step forward one snapshot. Returns the state to restore, or `None`
    /// when the redo buffer is empty.
    pub fn redo(&mut self) -> Option<T> {
        let next = self.redo.pop()?;
        self.stack.push_back(next);
        self.stack.back().cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }
}

impl<T: Clone> Default for HistoryStack<T> {
    /// Default capacity of 100 snapshots.
    fn default() -> Self {
        Self::new(100)
    }
}
