//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and bounded capacity.

use std::time::Duration;

mod entry;
mod stats;
mod store;


// Re-export public types
pub use stats::CacheStats;
pub use store::Cache;

// == Public Constants ==
/// Default maximum number of entries
pub const DEFAULT_CAPACITY: usize = 100;

/// Default time-to-live for entries
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);
