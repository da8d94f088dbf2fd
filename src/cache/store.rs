//! Expiring Store Module
//!
//! Generic string-keyed map with per-key optional TTL. Expired entries are
//! hidden from readers immediately (lazy expiry) and physically removed by a
//! periodic sweep. `get` never mutates on an expired hit, so the read path only
//! ever takes the shared lock; an expired value may therefore linger in memory
//! until the next sweep.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::cache::CacheEntry;
use crate::tasks::spawn_sweep_task;

// == Expiring Store ==
/// Thread-safe key/value store with lazy expiry and a background sweeper.
///
/// Readers share the lock; `set`, `delete`, `clear` and the sweep take it
/// exclusively. No I/O is ever performed while the lock is held.
#[derive(Debug)]
pub struct ExpiringStore<V> {
    /// Key-value storage
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    /// Total entries physically removed by sweeps
    swept: Mutex<u64>,
    /// Handle of the running sweep task, if started
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<V> Default for ExpiringStore<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            swept: Mutex::new(0),
            sweeper: Mutex::new(None),
        }
    }
}

impl<V: Clone + Send + Sync + 'static> ExpiringStore<V> {
    // == Constructor ==
    /// Creates an empty store with no sweeper running.
    pub fn new() -> Self {
        Self::default()
    }

    // == Start Sweeper ==
    /// Starts the background sweep task on the current tokio runtime.
    ///
    /// Calling this again replaces (and aborts) the previous sweeper.
    pub fn start_sweeper(self: &Arc<Self>, interval: Duration) {
        let handle = spawn_sweep_task(Arc::downgrade(self), interval);
        if let Some(previous) = self.sweeper.lock().replace(handle) {
            previous.abort();
        }
    }

    // == Shutdown ==
    /// Stops the sweep task. Entries are left untouched.
    pub fn shutdown(&self) {
        if let Some(handle) = self.sweeper.lock().take() {
            handle.abort();
        }
    }

    // == Get ==
    /// Returns a clone of the value if present and not expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let entries = self.entries.read();
        entries
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores `value` under `key`, replacing any previous value and deadline.
    ///
    /// A `ttl` of `None` or zero means the entry never expires.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Option<Duration>) {
        let entry = CacheEntry::new(value, ttl);
        self.entries.write().insert(key.into(), entry);
    }

    // == Delete ==
    /// Removes an entry. Deleting an absent key is a no-op.
    pub fn delete(&self, key: &str) {
        self.entries.write().remove(key);
    }

    // == Clear ==
    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    // == Sweep ==
    /// Physically removes every entry expired at `now`.
    ///
    /// Returns the number of entries removed.
    pub fn sweep_expired_at(&self, now: Instant) -> usize {
        let removed = {
            let mut entries = self.entries.write();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired_at(now));
            before - entries.len()
        };

        *self.swept.lock() += removed as u64;
        removed
    }

    /// Removes every entry expired as of the current instant.
    pub fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(Instant::now())
    }

    // == Length ==
    /// Number of physically stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Total number of entries removed by sweeps since creation.
    pub fn swept_total(&self) -> u64 {
        *self.swept.lock()
    }
}

impl<V> Drop for ExpiringStore<V> {
    fn drop(&mut self) {
        if let Some(handle) = self.sweeper.get_mut().take() {
            handle.abort();
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_new() {
        let store: ExpiringStore<String> = ExpiringStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let store = ExpiringStore::new();

        store.set("key1", "value1".to_string(), None);

        assert_eq!(store.get("key1").as_deref(), Some("value1"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let store: ExpiringStore<String> = ExpiringStore::new();
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_delete_is_idempotent() {
        let store = ExpiringStore::new();

        store.set("key1", 1u32, None);
        store.delete("key1");
        store.delete("key1");

        assert!(store.is_empty());
        assert!(store.get("key1").is_none());
    }

    #[test]
    fn test_store_overwrite() {
        let store = ExpiringStore::new();

        store.set("key1", "value1", None);
        store.set("key1", "value2", None);

        assert_eq!(store.get("key1"), Some("value2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_clear() {
        let store = ExpiringStore::new();

        store.set("a", 1u8, None);
        store.set("b", 2u8, Some(Duration::from_secs(60)));
        store.clear();

        assert!(store.is_empty());
        assert!(store.get("a").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_ttl_expiration_is_lazy() {
        let store = ExpiringStore::new();

        store.set("key1", "value1", Some(Duration::from_secs(1)));
        assert!(store.get("key1").is_some());

        tokio::time::advance(Duration::from_secs(1)).await;

        // Hidden from readers but still physically present until a sweep
        assert!(store.get("key1").is_none());
        assert_eq!(store.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_without_ttl_clears_previous_deadline() {
        let store = ExpiringStore::new();

        store.set("key1", 1u32, Some(Duration::from_secs(1)));
        store.set("key1", 2u32, None);

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(store.get("key1"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_sweep_expired() {
        let store = ExpiringStore::new();

        store.set("key1", "value1", Some(Duration::from_secs(1)));
        store.set("key2", "value2", Some(Duration::from_secs(10)));
        store.set("key3", "value3", None);

        tokio::time::advance(Duration::from_secs(2)).await;

        let removed = store.sweep_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 2);
        assert_eq!(store.swept_total(), 1);
        assert!(store.get("key2").is_some());
        assert!(store.get("key3").is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_removes_entry_expiring_exactly_at_tick() {
        let store = ExpiringStore::new();
        store.set("key1", 1u8, Some(Duration::from_secs(5)));

        // The clock is paused, so this is the entry's exact deadline
        let deadline = Instant::now() + Duration::from_secs(5);
        assert_eq!(store.sweep_expired_at(deadline - Duration::from_millis(1)), 0);
        assert_eq!(store.sweep_expired_at(deadline), 1);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_access() {
        let store = Arc::new(ExpiringStore::new());

        let mut handles = Vec::new();
        for worker in 0..8u32 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for i in 0..200u32 {
                    let key = format!("key_{}", i % 16);
                    store.set(key.clone(), worker * 1000 + i, None);
                    let _ = store.get(&key);
                    if i % 7 == 0 {
                        store.delete(&key);
                    }
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert!(store.len() <= 16);
    }
}
