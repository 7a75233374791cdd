//! Caching utilities for the trip planner.
//!
//! This module provides a bounded cache with TTL expiry and FIFO eviction,
//! a mutex-guarded handle for sharing it between async tasks, and helpers
//! for deriving normalized cache keys from request parameters.

pub mod bounded_cache;
pub mod clock;
pub mod key;
pub mod shared;

pub use bounded_cache::{BoundedCache, CacheConfig};
pub use clock::{Clock, ManualClock, SystemClock};
pub use key::{normalize_text, CacheKey};
pub use shared::{CacheStats, SharedCache};
