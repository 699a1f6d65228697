//! Bounded undo/redo history over board snapshots.
//!
//! # Responsibility
//! - Keep a linear stack of detached board captures with a cursor.
//! - Guard against snapshots being recorded while one is being applied.
//!
//! # Invariants
//! - `cursor` always points at the entry matching the live board (the
//!   stack is never empty after the first push).
//! - Pushing while the cursor sits behind the tip destroys the redo
//!   branch before appending; there is no tree history.
//! - The stack never exceeds `max`; the oldest entry is evicted first,
//!   silently capping how far back undo reaches.
//!
//! # See also
//! - `crate::session` for the debounce policy deciding when pushes happen.

use crate::model::snapshot::BoardSnapshot;

/// Default stack depth. Sessions construct theirs deeper (80).
pub const DEFAULT_MAX_DEPTH: usize = 60;

/// Linear snapshot stack with a cursor and a re-entrancy guard.
#[derive(Debug)]
pub struct HistoryManager {
    stack: Vec<BoardSnapshot>,
    cursor: usize,
    max: usize,
    applying: bool,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max: usize) -> Self {
        Self {
            stack: Vec::new(),
            cursor: 0,
            // A zero-depth history cannot hold its baseline entry.
            max: max.max(1),
            applying: false,
        }
    }

    /// Records a new tip state. Returns `false` when the push was refused
    /// by the re-entrancy guard (an undo/redo apply is in progress).
    pub fn push(&mut self, snapshot: BoardSnapshot) -> bool {
        if self.applying {
            return false;
        }
        if !self.stack.is_empty() && self.cursor < self.stack.len() - 1 {
            self.stack.truncate(self.cursor + 1);
        }
        self.stack.push(snapshot);
        if self.stack.len() > self.max {
            self.stack.remove(0);
        }
        self.cursor = self.stack.len() - 1;
        true
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        !self.stack.is_empty() && self.cursor < self.stack.len() - 1
    }

    /// Steps the cursor back one entry and hands that snapshot to `apply`.
    /// Returns `false` without calling `apply` when already at the oldest
    /// retained entry.
    pub fn undo<F>(&mut self, apply: F) -> bool
    where
        F: FnOnce(&BoardSnapshot),
    {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        self.applying = true;
        apply(&self.stack[self.cursor]);
        self.applying = false;
        true
    }

    /// Steps the cursor forward one entry and hands that snapshot to
    /// `apply`. Returns `false` without calling `apply` at the tip.
    pub fn redo<F>(&mut self, apply: F) -> bool
    where
        F: FnOnce(&BoardSnapshot),
    {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        self.applying = true;
        apply(&self.stack[self.cursor]);
        self.applying = false;
        true
    }

    /// The snapshot under the cursor, without moving it. `None` only
    /// before the first push.
    pub fn peek(&self) -> Option<&BoardSnapshot> {
        self.stack.get(self.cursor)
    }

    /// Number of retained entries.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}
