//! Expiring Cache - a thread-safe, bounded key/value cache
//!
//! Entries carry a time-to-live; capacity overruns are resolved with a
//! two-phase expire-then-sample eviction pass on insert.

pub mod cache;
pub mod clock;

pub use cache::{Cache, CacheStats, DEFAULT_CAPACITY, DEFAULT_TTL};
pub use clock::{Clock, ManualClock, SystemClock};
