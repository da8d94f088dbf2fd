//! Store Sweep Task
//!
//! Background task that periodically removes expired store entries.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ExpiringStore;

/// Spawns a background task that sweeps `store` every `interval`.
///
/// The task holds only a weak reference and exits on its own once the store
/// is dropped. The returned handle lets the owner abort it earlier.
pub fn spawn_sweep_task<V>(store: Weak<ExpiringStore<V>>, interval: Duration) -> JoinHandle<()>
where
    V: Clone + Send + Sync + 'static,
{
    tokio::spawn(async move {
        debug!("Starting store sweep task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let Some(store) = store.upgrade() else {
                debug!("Store dropped, sweep task exiting");
                break;
            };

            let removed = store.sweep_expired();
            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_sweep_task_removes_expired_entries() {
        let store = Arc::new(ExpiringStore::new());
        store.set("expire_soon", "value", Some(Duration::from_secs(1)));
        store.set("long_lived", "value", Some(Duration::from_secs(3600)));

        let handle = spawn_sweep_task(Arc::downgrade(&store), Duration::from_secs(5));

        // Lazily hidden before the first tick, physically removed after it
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(store.len(), 2);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(store.len(), 1);
        assert!(store.get("long_lived").is_some());
        assert_eq!(store.swept_total(), 1);

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweep_task_exits_when_store_dropped() {
        let store: Arc<ExpiringStore<u8>> = Arc::new(ExpiringStore::new());
        let handle = spawn_sweep_task(Arc::downgrade(&store), Duration::from_secs(1));

        drop(store);
        tokio::time::sleep(Duration::from_secs(2)).await;

        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_shutdown_stops_sweeper() {
        let store = Arc::new(ExpiringStore::new());
        store.set("k", 1u8, Some(Duration::from_secs(1)));
        store.start_sweeper(Duration::from_secs(5));

        store.shutdown();
        tokio::time::sleep(Duration::from_secs(30)).await;

        // No sweep ran, so the expired entry is still physically present
        assert_eq!(store.len(), 1);
        assert!(store.get("k").is_none());
    }
}
