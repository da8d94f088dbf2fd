//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the expiring store's contract against a plain
//! HashMap model.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::cache::{CacheEntry, ExpiringStore};

// == Strategies ==
/// Generates cache keys from a small alphabet so operations collide often
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}".prop_map(|s| s)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Delete { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Delete { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Without TTLs the store behaves exactly like a map: set overwrites,
    // delete removes, and keys never set or already deleted are absent.
    #[test]
    fn prop_matches_map_model(ops in prop::collection::vec(cache_op_strategy(), 1..80)) {
        let store = ExpiringStore::new();
        let mut model: HashMap<String, u32> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    store.set(key.clone(), value, None);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(store.get(&key), model.get(&key).copied());
                }
                CacheOp::Delete { key } => {
                    store.delete(&key);
                    model.remove(&key);
                }
            }
        }

        prop_assert_eq!(store.len(), model.len());
    }

    // Deleting twice leaves the same state as deleting once.
    #[test]
    fn prop_delete_is_idempotent(key in key_strategy(), other in key_strategy(), value in any::<u32>()) {
        let once = ExpiringStore::new();
        let twice = ExpiringStore::new();
        for store in [&once, &twice] {
            store.set(key.clone(), value, None);
            store.set(other.clone(), value, None);
            store.delete(&key);
        }
        twice.delete(&key);

        prop_assert!(once.get(&key).is_none());
        prop_assert!(twice.get(&key).is_none());
        prop_assert_eq!(once.len(), twice.len());
        prop_assert_eq!(once.get(&other), twice.get(&other));
    }

    // A zero TTL never expires, however late the check or the sweep.
    #[test]
    fn prop_zero_ttl_never_expires(key in key_strategy(), value in any::<u32>(), later_secs in 0u64..10_000_000) {
        let store = ExpiringStore::new();
        store.set(key.clone(), value, Some(Duration::ZERO));

        let later = Instant::now() + Duration::from_secs(later_secs);
        prop_assert_eq!(store.sweep_expired_at(later), 0);
        prop_assert_eq!(store.get(&key), Some(value));
    }

    // An entry with TTL d is live strictly before its deadline and absent at
    // or after it.
    #[test]
    fn prop_ttl_boundary(ttl_ms in 1u64..1_000_000, elapsed_ms in 0u64..2_000_000) {
        let entry = CacheEntry::new((), Some(Duration::from_millis(ttl_ms)));
        let deadline = entry.expires_at.unwrap();
        let at = deadline - Duration::from_millis(ttl_ms) + Duration::from_millis(elapsed_ms);

        prop_assert_eq!(entry.is_expired_at(at), elapsed_ms >= ttl_ms);
    }

    // A sweep removes exactly the entries whose deadline is at or before the tick.
    #[test]
    fn prop_sweep_removes_only_expired(ttls in prop::collection::vec(0u64..100, 1..30), tick in 0u64..100) {
        let store = ExpiringStore::new();
        let start = Instant::now();
        for (i, ttl) in ttls.iter().enumerate() {
            store.set(format!("k{}", i), i, Some(Duration::from_secs(*ttl)));
        }

        // Entries are created a hair after `start`, so a deadline exactly at
        // start + tick is not yet due at that instant
        let removed = store.sweep_expired_at(start + Duration::from_secs(tick));
        let expected = ttls.iter().filter(|ttl| **ttl != 0 && **ttl < tick).count();

        prop_assert!(removed >= expected);
        prop_assert!(removed <= ttls.iter().filter(|ttl| **ttl != 0 && **ttl <= tick).count());
        prop_assert_eq!(store.len(), ttls.len() - removed);
    }
}
