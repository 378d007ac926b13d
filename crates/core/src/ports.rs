//! Injected time and identifier sources.
//!
//! Ambient `Utc::now()` / random id generation make audit timestamps and
//! entry ids impossible to pin down in tests, so both are behind small
//! trait ports. Production wires `SystemClock`/`UuidSource`; tests wire
//! `FixedClock`/`SequenceSource`.

use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant, advanced explicitly. Test use only.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Pinned to 2024-01-01T00:00:00Z.
    pub fn at_epoch() -> Self {
        Self::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    pub fn advance(&self, duration: chrono::Duration) {
        let mut now = self.now.lock().expect("clock lock poisoned");
        *now += duration;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock poisoned")
    }
}

/// Source of fresh identifiers.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> Uuid;
}

/// UUIDv7 (time-ordered) identifiers.
#[derive(Debug, Default)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&self) -> Uuid {
        Uuid::now_v7()
    }
}

/// Deterministic counter-backed ids. Test use only.
#[derive(Debug, Default)]
pub struct SequenceSource {
    counter: Mutex<u64>,
}

impl SequenceSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequenceSource {
    fn next_id(&self) -> Uuid {
        let mut counter = self.counter.lock().expect("id counter lock poisoned");
        *counter += 1;
        Uuid::from_u128(*counter as u128)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_advances_only_when_told() {
        let clock = FixedClock::at_epoch();
        let t0 = clock.now();
        assert_eq!(t0, clock.now());

        clock.advance(chrono::Duration::seconds(5));
        assert_eq!(clock.now() - t0, chrono::Duration::seconds(5));
    }

    #[test]
    fn sequence_source_is_deterministic() {
        let ids = SequenceSource::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert_eq!(a, Uuid::from_u128(1));
        assert_eq!(b, Uuid::from_u128(2));
    }
}
