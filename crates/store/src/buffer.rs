//! The buffered-write component.
//!
//! Durable writes are not performed per mutation: each mutation re-arms a
//! trailing deadline, and only once the deadline passes uninterrupted does
//! the store flush. Bursts of edits coalesce into one write; mutations
//! inside the window are lost on abrupt termination. That window is a
//! stated contract, bounded by the delay below and closed by `flush()` or
//! the store's flush-on-drop.
//!
//! There is no timer thread. The model is single-threaded and cooperative,
//! so the owner polls `is_due(now)` on its own cadence.

use chrono::{DateTime, Duration, Utc};

/// Default trailing delay before a dirty buffer is considered due.
pub const DEFAULT_FLUSH_DELAY_MS: i64 = 1_000;

/// Dirty flag plus a cancel-and-reset deadline.
#[derive(Debug)]
pub struct WriteBuffer {
    delay: Duration,
    dirty: bool,
    deadline: Option<DateTime<Utc>>,
}

impl WriteBuffer {
    pub fn new() -> Self {
        Self::with_delay(Duration::milliseconds(DEFAULT_FLUSH_DELAY_MS))
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            dirty: false,
            deadline: None,
        }
    }

    /// Note a mutation at `now`. Re-arms the deadline; an earlier pending
    /// deadline is abandoned, so only the final state of a burst flushes.
    pub fn mark_dirty(&mut self, now: DateTime<Utc>) {
        self.dirty = true;
        self.deadline = Some(now + self.delay);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the trailing delay has elapsed uninterrupted.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.dirty && self.deadline.is_some_and(|deadline| now >= deadline)
    }

    /// Mark everything flushed.
    pub fn settle(&mut self) {
        self.dirty = false;
        self.deadline = None;
    }
}

impl Default for WriteBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn clean_buffer_is_never_due() {
        let buffer = WriteBuffer::new();
        assert!(!buffer.is_dirty());
        assert!(!buffer.is_due(t0() + Duration::days(1)));
    }

    #[test]
    fn becomes_due_after_the_trailing_delay() {
        let mut buffer = WriteBuffer::new();
        buffer.mark_dirty(t0());
        assert!(!buffer.is_due(t0() + Duration::milliseconds(999)));
        assert!(buffer.is_due(t0() + Duration::milliseconds(1_000)));
    }

    #[test]
    fn each_mutation_resets_the_deadline() {
        let mut buffer = WriteBuffer::new();
        buffer.mark_dirty(t0());
        buffer.mark_dirty(t0() + Duration::milliseconds(900));
        // The original deadline has passed, but the burst re-armed it.
        assert!(!buffer.is_due(t0() + Duration::milliseconds(1_100)));
        assert!(buffer.is_due(t0() + Duration::milliseconds(1_900)));
    }

    #[test]
    fn settle_clears_the_dirty_state() {
        let mut buffer = WriteBuffer::new();
        buffer.mark_dirty(t0());
        buffer.settle();
        assert!(!buffer.is_dirty());
        assert!(!buffer.is_due(t0() + Duration::hours(1)));
    }
}
