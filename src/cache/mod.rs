//! Cache Module
//!
//! In-process caching for the event read path: a generic expiring store and
//! the coordinator that decides when to consult, populate or invalidate it.

mod coordinator;
mod entry;
mod keys;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use coordinator::{CacheCoordinator, CacheSettings, CachedValue};
pub use entry::CacheEntry;
pub use keys::{event_key, RECENT_EVENTS_KEY};
pub use stats::CacheStats;
pub use store::ExpiringStore;
