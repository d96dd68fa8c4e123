//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cache entry: the stored value plus its absolute expiration
/// instant. Replaced wholesale when the same key is inserted again.
#[derive(Debug, Clone)]
pub(crate) struct Entry<V> {
    /// The stored value
    pub value: V,
    /// Instant at which the entry stops being valid
    pub expires_at: Instant,
}

impl<V> Entry<V> {
    /// Creates an entry expiring `ttl` after `now`.
    pub fn new(value: V, now: Instant, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: now + ttl,
        }
    }

    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once `now` is greater
    /// than or equal to the expiration instant, so a read made exactly
    /// when the TTL elapses never observes the value.
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    /// Pushes the expiration out to `ttl` after `now` (sliding
    /// expiration).
    pub fn refresh(&mut self, now: Instant, ttl: Duration) {
        self.expires_at = now + ttl;
    }

    /// Remaining time before expiration, zero if already expired.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.expires_at.saturating_duration_since(now)
    }
}
