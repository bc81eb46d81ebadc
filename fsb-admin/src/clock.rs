//! Time and identifier capabilities injected into the registry.
//!
//! Nothing in the service reads the wall clock directly; everything goes
//! through a [`Clock`] so expiry and stats logic can be driven from tests.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

/// Bot identifiers derived from the clock's nanosecond timestamp.
///
/// Ids are strictly increasing for the lifetime of the generator even if
/// the clock stalls or steps backwards: a stamp that is not ahead of the
/// last issued id is bumped to `last + 1`.
pub struct MonotonicIdGenerator {
    clock: Arc<dyn Clock>,
    last: AtomicI64,
}

impl MonotonicIdGenerator {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            last: AtomicI64::new(0),
        }
    }

    fn next_value(&self) -> i64 {
        let stamp = self.clock.now().timestamp_nanos_opt().unwrap_or(i64::MAX);
        let mut last = self.last.load(Ordering::Acquire);
        loop {
            let next = if stamp > last { stamp } else { last.saturating_add(1) };
            match self
                .last
                .compare_exchange_weak(last, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return next,
                Err(actual) => last = actual,
            }
        }
    }
}

impl IdGenerator for MonotonicIdGenerator {
    fn next_id(&self) -> String {
        self.next_value().to_string()
    }
}
