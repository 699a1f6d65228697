//! Debounced commit scheduling for board edits.
//!
//! # Responsibility
//! - Collapse bursts of small edits (drags, keystrokes, color flips) into a
//!   single history entry by delaying the commit behind a sliding deadline.
//! - Expose an explicit, clock-driven surface: callers pass `Instant::now()`
//!   in and poll for due work, so tests can drive time instead of sleeping.
//!
//! # Invariants
//! - Re-scheduling while a commit is pending replaces the deadline, it never
//!   queues a second one.
//! - A cancelled or taken deadline is gone; `due` never reports it again.
//!
//! # See also
//! - `crate::session`: flushes due commits from `BoardSession::tick`.
//! - `crate::history`: receives the snapshot once the commit fires.

use std::time::{Duration, Instant};

/// Quiet period between the last edit and the history commit it produces.
pub const DEBOUNCE_MS: u64 = 200;

/// Sliding-deadline scheduler for a single pending commit.
#[derive(Debug, Default)]
pub struct CommitScheduler {
    deadline: Option<Instant>,
}

impl CommitScheduler {
    pub fn new() -> Self {
        Self { deadline: None }
    }

    /// Schedules a commit `DEBOUNCE_MS` after `now`, replacing any pending one.
    pub fn schedule(&mut self, now: Instant) {
        self.deadline = Some(now + Duration::from_millis(DEBOUNCE_MS));
    }

    /// Drops the pending commit, if any.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True when a commit is pending and its deadline has passed.
    pub fn due(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }

    /// Consumes the deadline when due. Returns whether the caller should commit.
    pub fn take_due(&mut self, now: Instant) -> bool {
        if self.due(now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_slides_forward_on_reschedule() {
        let start = Instant::now();
        let mut scheduler = CommitScheduler::new();
        scheduler.schedule(start);
        let later = start + Duration::from_millis(150);
        scheduler.schedule(later);

        assert!(!scheduler.due(start + Duration::from_millis(DEBOUNCE_MS)));
        assert!(scheduler.due(later + Duration::from_millis(DEBOUNCE_MS)));
    }

    #[test]
    fn take_due_consumes_the_deadline() {
        let start = Instant::now();
        let mut scheduler = CommitScheduler::new();
        scheduler.schedule(start);
        let fired = start + Duration::from_millis(DEBOUNCE_MS + 1);

        assert!(scheduler.take_due(fired));
        assert!(!scheduler.pending());
        assert!(!scheduler.take_due(fired));
    }

    #[test]
    fn cancel_discards_pending_work() {
        let start = Instant::now();
        let mut scheduler = CommitScheduler::new();
        scheduler.schedule(start);
        scheduler.cancel();

        assert!(!scheduler.pending());
        assert!(!scheduler.due(start + Duration::from_secs(10)));
    }
}
