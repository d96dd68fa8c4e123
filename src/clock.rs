//! Clock Module
//!
//! Time source abstraction so that TTL behavior can be tested
//! deterministically instead of sleeping through real durations.

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

// == Clock Trait ==
/// Source of the current instant used for expiration checks.
///
/// The cache treats the clock as monotonic non-decreasing; every
/// expiration check is made against the latest reading.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

// == System Clock ==
/// Default clock backed by [`Instant::now`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

// == Manual Clock ==
/// Manually controlled clock for tests.
///
/// Until an override is set (via [`set`](ManualClock::set) or
/// [`advance`](ManualClock::advance)), readings come from the system
/// clock. Once set, the override is returned verbatim until
/// [`clear`](ManualClock::clear) restores real time.
#[derive(Debug, Default)]
pub struct ManualClock {
    overridden: Mutex<Option<Instant>>,
}

impl ManualClock {
    /// Creates a manual clock with no override (system time).
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the clock to the given instant.
    pub fn set(&self, at: Instant) {
        *self.overridden.lock() = Some(at);
    }

    /// Removes the override, restoring system time.
    pub fn clear(&self) {
        *self.overridden.lock() = None;
    }

    /// Moves the clock forward by `d`, starting from the current
    /// override if one is set, otherwise from the real current time.
    pub fn advance(&self, d: Duration) {
        let mut overridden = self.overridden.lock();
        let base = overridden.unwrap_or_else(Instant::now);
        *overridden = Some(base + d);
    }

    /// Moves the clock backward by `d`.
    ///
    /// Saturates (leaves the clock unchanged) if the platform cannot
    /// represent an instant that far in the past.
    pub fn rewind(&self, d: Duration) {
        let mut overridden = self.overridden.lock();
        let base = overridden.unwrap_or_else(Instant::now);
        *overridden = Some(base.checked_sub(d).unwrap_or(base));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.overridden.lock().unwrap_or_else(Instant::now)
    }
}
