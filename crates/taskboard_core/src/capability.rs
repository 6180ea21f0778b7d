//! Injectable runtime capabilities: wall clock and id generation.
//!
//! # Responsibility
//! - Keep time and randomness out of mutation logic so callers (and tests)
//!   decide where they come from.
//!
//! # Invariants
//! - `IdGenerator::next_id` never returns the same value twice for one
//!   generator instance.

use crate::model::timestamp::format_timestamp;
use chrono::{DateTime, Duration, Utc};
use std::cell::Cell;
use uuid::Uuid;

/// Source of "now" for record timestamps.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    /// Current time formatted as a record timestamp.
    fn timestamp(&self) -> String {
        format_timestamp(self.now())
    }
}

/// Source of fresh record ids.
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Wall clock backed by the host system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Random UUID v4 ids.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    current: Cell<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            current: Cell::new(start),
        }
    }

    /// Moves the clock forward (or backward, for negative durations).
    pub fn advance(&self, by: Duration) {
        self.current.set(self.current.get() + by);
    }

    pub fn set(&self, at: DateTime<Utc>) {
        self.current.set(at);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.current.get()
    }
}

/// Deterministic `<prefix>-<n>` ids.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(1),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let value = self.next.get();
        self.next.set(value + 1);
        format!("{}-{value}", self.prefix)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

impl<I: IdGenerator + ?Sized> IdGenerator for &I {
    fn next_id(&self) -> String {
        (**self).next_id()
    }
}
