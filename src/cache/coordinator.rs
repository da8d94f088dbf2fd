//! Cache Coordinator Module
//!
//! Policy layer over one [`ExpiringStore`]: key naming, populate on miss,
//! populate on schedule, and invalidation after writes.
//!
//! Locking is split per key family. Populating the recent view holds
//! `recent_flight` across the repository call so concurrent misses collapse
//! into one load; single-event misses are not serialized and may load the same
//! row more than once. Every key carries a generation bumped by its
//! invalidation: a load that started under an older generation returns its
//! value to its own caller but is never written back, so a write that commits
//! mid-load cannot be shadowed by the stale result. Single events are tracked
//! per id, so invalidating one event leaves loads of the others alone.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{event_key, CacheStats, ExpiringStore, RECENT_EVENTS_KEY};
use crate::error::Result;
use crate::models::{EventResponse, PaginatedEvents};
use crate::repository::EventRepository;
use crate::tasks::spawn_refresh_task;

// == Cached Value ==
/// Values the coordinator keeps in its store.
#[derive(Debug, Clone)]
pub enum CachedValue {
    Event(Arc<EventResponse>),
    Recent(Arc<PaginatedEvents>),
}

// == Settings ==
/// Tuning knobs of the coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// TTL of a cached single event
    pub entity_ttl: Duration,
    /// TTL of the cached recent view
    pub recent_ttl: Duration,
    /// Period of the scheduled recent view rebuild
    pub refresh_interval: Duration,
    /// Period of the store sweep
    pub sweep_interval: Duration,
    /// Number of events fetched when building the recent view
    pub recent_fetch: u32,
    /// Number of events kept in the recent view
    pub recent_limit: usize,
    /// Rebuild the recent view on every read, even on a hit
    pub force_refresh: bool,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            entity_ttl: Duration::from_secs(300),
            recent_ttl: Duration::from_secs(300),
            refresh_interval: Duration::from_secs(120),
            sweep_interval: Duration::from_secs(300),
            recent_fetch: 8,
            recent_limit: 5,
            force_refresh: false,
        }
    }
}

/// Per-id generations are forgotten once this many are tracked.
const MAX_TRACKED_ENTITY_GENERATIONS: usize = 1024;

// == Entity Generations ==
/// Invalidation generations of single events.
///
/// Ids without an entry are at `floor`. Forgetting the map raises `floor`
/// past every generation handed out, so a load that was in flight at that
/// moment is never written back.
#[derive(Debug, Default)]
struct EntityGenerations {
    next: u64,
    floor: u64,
    by_id: HashMap<u64, u64>,
}

impl EntityGenerations {
    fn current(&self, id: u64) -> u64 {
        self.by_id.get(&id).copied().unwrap_or(self.floor)
    }

    fn bump(&mut self, id: u64) {
        self.next += 1;
        self.by_id.insert(id, self.next);
        if self.by_id.len() > MAX_TRACKED_ENTITY_GENERATIONS {
            self.bump_all();
        }
    }

    fn bump_all(&mut self) {
        self.next += 1;
        self.floor = self.next;
        self.by_id.clear();
    }

    fn tracked(&self) -> usize {
        self.by_id.len()
    }
}

// == Cache Coordinator ==
/// Caches single events and the recent events view in front of an
/// [`EventRepository`].
///
/// Reads populate on miss. Writers call [`CacheCoordinator::invalidate_entity`]
/// and [`CacheCoordinator::invalidate_recent_and_refresh`] once their change is
/// committed. After [`CacheCoordinator::start`], a background task rebuilds
/// the recent view every `refresh_interval` and the store sweeps expired
/// entries every `sweep_interval`.
pub struct CacheCoordinator {
    store: Arc<ExpiringStore<CachedValue>>,
    repo: Arc<dyn EventRepository>,
    settings: CacheSettings,
    recent_flight: tokio::sync::Mutex<()>,
    recent_generation: Mutex<u64>,
    entity_generations: Mutex<EntityGenerations>,
    stats: Mutex<CacheStats>,
    refresher: Mutex<Option<JoinHandle<()>>>,
}

impl CacheCoordinator {
    // == Constructor ==
    /// Creates a coordinator with an empty store. No background task runs
    /// until [`CacheCoordinator::start`] is called.
    pub fn new(repo: Arc<dyn EventRepository>, settings: CacheSettings) -> Arc<Self> {
        Arc::new(Self {
            store: Arc::new(ExpiringStore::new()),
            repo,
            settings,
            recent_flight: tokio::sync::Mutex::new(()),
            recent_generation: Mutex::new(0),
            entity_generations: Mutex::new(EntityGenerations::default()),
            stats: Mutex::new(CacheStats::new()),
            refresher: Mutex::new(None),
        })
    }

    // == Start ==
    /// Starts the store sweeper and the scheduled refresh task. The refresh
    /// task warms the recent view immediately.
    pub fn start(self: &Arc<Self>) {
        self.store.start_sweeper(self.settings.sweep_interval);

        let handle = spawn_refresh_task(Arc::downgrade(self), self.settings.refresh_interval);
        if let Some(previous) = self.refresher.lock().replace(handle) {
            previous.abort();
        }
        info!(
            "Cache coordinator started: refresh every {:?}, sweep every {:?}",
            self.settings.refresh_interval, self.settings.sweep_interval
        );
    }

    // == Shutdown ==
    /// Stops both background tasks. Cached entries stay readable.
    pub fn shutdown(&self) {
        if let Some(handle) = self.refresher.lock().take() {
            handle.abort();
        }
        self.store.shutdown();
        info!("Cache coordinator stopped");
    }

    // == Get Entity ==
    /// Returns one event, from the cache when present, otherwise loaded from
    /// the repository and cached for `entity_ttl`.
    ///
    /// A hit is returned as is; an event changed directly in the repository is
    /// only seen once the entry expires or is invalidated.
    pub async fn get_entity(&self, id: u64) -> Result<Arc<EventResponse>> {
        let key = event_key(id);
        if let Some(CachedValue::Event(event)) = self.store.get(&key) {
            self.stats.lock().record_hit();
            debug!(id, "Cache hit for event");
            return Ok(event);
        }

        self.stats.lock().record_miss();
        debug!(id, "Cache miss for event, loading from repository");

        let generation = self.entity_generations.lock().current(id);
        let event = match self.repo.get_event(id).await {
            Ok(event) => event,
            Err(err) => {
                self.stats.lock().record_failure();
                debug!(id, error = %err, "Event load failed, nothing cached");
                return Err(err);
            }
        };

        let response = Arc::new(EventResponse::from(event));
        let generations = self.entity_generations.lock();
        self.write_back(
            generations.current(id) == generation,
            key,
            CachedValue::Event(response.clone()),
            self.settings.entity_ttl,
        );
        drop(generations);
        Ok(response)
    }

    // == Get Recent ==
    /// Returns the recent events view. A cold cache is never an error: it
    /// falls through to a synchronous rebuild.
    pub async fn get_recent(&self) -> Result<Arc<PaginatedEvents>> {
        match self.store.get(RECENT_EVENTS_KEY) {
            Some(CachedValue::Recent(recent)) if !self.settings.force_refresh => {
                self.stats.lock().record_hit();
                debug!("Serving recent events from cache");
                Ok(recent)
            }
            Some(CachedValue::Recent(_)) => {
                self.stats.lock().record_miss();
                info!("Forcing recent events refresh");
                self.populate_recent(true).await
            }
            _ => {
                self.stats.lock().record_miss();
                info!("Recent events not cached, rebuilding");
                self.populate_recent(false).await
            }
        }
    }

    // == Invalidate Entity ==
    /// Drops the cached copy of one event.
    pub fn invalidate_entity(&self, id: u64) {
        let mut generations = self.entity_generations.lock();
        generations.bump(id);
        self.store.delete(&event_key(id));
        drop(generations);
        debug!(id, "Invalidated cached event");
    }

    // == Invalidate Recent And Refresh ==
    /// Drops the recent view and rebuilds it in the background.
    ///
    /// Returns without waiting for the rebuild. The handle is only useful to
    /// callers that want to await it, such as tests.
    pub fn invalidate_recent_and_refresh(self: &Arc<Self>) -> JoinHandle<()> {
        self.invalidate_recent();
        debug!("Invalidated recent events, scheduling rebuild");

        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            // Failures are logged by populate_recent; the next read or tick retries.
            let _ = coordinator.populate_recent(false).await;
        })
    }

    // == Refresh Recent ==
    /// Unconditionally drops and rebuilds the recent view. Used by the
    /// scheduled refresh, since upcoming vs past changes with the clock alone.
    pub async fn refresh_recent(&self) -> Result<Arc<PaginatedEvents>> {
        self.invalidate_recent();
        self.populate_recent(true).await
    }

    // == Clear ==
    /// Empties the cache. In-flight loads are not written back.
    pub fn clear(&self) {
        let mut recent = self.recent_generation.lock();
        let mut entities = self.entity_generations.lock();
        *recent += 1;
        entities.bump_all();
        self.store.clear();
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        self.stats.lock().clone()
    }

    /// Entries physically held by the store, including expired ones not yet swept.
    pub fn entry_count(&self) -> usize {
        self.store.len()
    }

    /// Entries removed by the store's sweeps so far.
    pub fn swept_total(&self) -> u64 {
        self.store.swept_total()
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    // == Internals ==
    async fn populate_recent(&self, force: bool) -> Result<Arc<PaginatedEvents>> {
        let _flight = self.recent_flight.lock().await;

        if !force {
            if let Some(CachedValue::Recent(recent)) = self.store.get(RECENT_EVENTS_KEY) {
                debug!("Recent events rebuilt by a concurrent caller");
                return Ok(recent);
            }
        }

        let generation = *self.recent_generation.lock();
        let (events, _) = match self
            .repo
            .list_events(1, self.settings.recent_fetch, None)
            .await
        {
            Ok(page) => page,
            Err(err) => {
                self.stats.lock().record_failure();
                warn!(error = %err, "Failed to load recent events, cache left empty");
                return Err(err);
            }
        };

        let top: Vec<_> = events.into_iter().take(self.settings.recent_limit).collect();
        let count = top.len();
        let recent = Arc::new(PaginatedEvents::new(
            top,
            count as u64,
            1,
            self.settings.recent_limit as u32,
        ));

        let current = self.recent_generation.lock();
        let stored = self.write_back(
            *current == generation,
            RECENT_EVENTS_KEY.to_string(),
            CachedValue::Recent(recent.clone()),
            self.settings.recent_ttl,
        );
        drop(current);
        if stored {
            info!(
                "Cached {} recent events for {:?}",
                count, self.settings.recent_ttl
            );
        }
        Ok(recent)
    }

    /// Stores `value` if its key was not invalidated during the load. The
    /// caller holds the key's generation lock across the call.
    /// Returns whether the value was stored.
    fn write_back(
        &self,
        unchanged: bool,
        key: String,
        value: CachedValue,
        ttl: Duration,
    ) -> bool {
        if !unchanged {
            debug!(key = %key, "Invalidated during load, skipping write-back");
            return false;
        }
        self.store.set(key, value, Some(ttl));
        self.stats.lock().record_populate();
        true
    }

    fn invalidate_recent(&self) {
        let mut generation = self.recent_generation.lock();
        *generation += 1;
        self.store.delete(RECENT_EVENTS_KEY);
    }
}

impl Drop for CacheCoordinator {
    fn drop(&mut self) {
        if let Some(handle) = self.refresher.get_mut().take() {
            handle.abort();
        }
    }
}
