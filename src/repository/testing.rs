//! Instrumented repository for unit tests: counts loads, injects failures and
//! can hold single-event loads open to widen race windows.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Semaphore;

use crate::error::{AppError, Result};
use crate::models::{Category, Event, NewEvent};
use crate::repository::{EventRepository, MemoryEventRepository};

#[derive(Default)]
pub struct CountingRepository {
    pub inner: MemoryEventRepository,
    pub event_loads: AtomicUsize,
    pub list_loads: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub fail_tags: AtomicBool,
    gate: parking_lot::Mutex<Option<Arc<Semaphore>>>,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event_loads(&self) -> usize {
        self.event_loads.load(Ordering::SeqCst)
    }

    pub fn list_loads(&self) -> usize {
        self.list_loads.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_reads.store(failing, Ordering::SeqCst);
    }

    pub fn set_failing_tags(&self, failing: bool) {
        self.fail_tags.store(failing, Ordering::SeqCst);
    }

    /// Makes every following `get_event` read its row, then wait for a permit.
    pub fn hold_event_loads(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.gate.lock() = Some(gate.clone());
        gate
    }

    fn check_failing(&self) -> Result<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("connection refused".to_string()));
        }
        Ok(())
    }

    /// Creates a category and one event per date, returning the events.
    pub async fn seed(&self, dates: &[DateTime<Utc>]) -> Vec<Event> {
        let category = self.inner.create_category("Seeded").await.unwrap();
        let mut events = Vec::new();
        for (i, date) in dates.iter().enumerate() {
            events.push(
                self.inner
                    .create_event(NewEvent {
                        name: format!("event-{}", i),
                        description: "seeded".to_string(),
                        category_id: category.id,
                        event_date: *date,
                        venue: "Hall".to_string(),
                        price: 1.0,
                        image_url: String::new(),
                    })
                    .await
                    .unwrap(),
            );
        }
        events
    }
}

#[async_trait]
impl EventRepository for CountingRepository {
    async fn create_event(&self, event: NewEvent) -> Result<Event> {
        self.inner.create_event(event).await
    }

    async fn get_event(&self, id: u64) -> Result<Event> {
        self.event_loads.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        let event = self.inner.get_event(id).await;

        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            gate.acquire().await.unwrap().forget();
        }
        event
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        self.inner.update_event(event).await
    }

    async fn delete_event(&self, id: u64) -> Result<()> {
        self.inner.delete_event(id).await
    }

    async fn replace_event_tags(&self, id: u64, names: &[String]) -> Result<()> {
        if self.fail_tags.load(Ordering::SeqCst) {
            return Err(AppError::Upstream("tag table unavailable".to_string()));
        }
        self.inner.replace_event_tags(id, names).await
    }

    async fn list_events(
        &self,
        page: u32,
        page_size: u32,
        category_id: Option<u64>,
    ) -> Result<(Vec<Event>, u64)> {
        self.list_loads.fetch_add(1, Ordering::SeqCst);
        self.check_failing()?;
        self.inner.list_events(page, page_size, category_id).await
    }

    async fn search_events(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Event>, u64)> {
        self.inner.search_events(query, page, page_size).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.inner.list_categories().await
    }

    async fn get_category(&self, id: u64) -> Result<Category> {
        self.inner.get_category(id).await
    }

    async fn create_category(&self, name: &str) -> Result<Category> {
        self.inner.create_category(name).await
    }

    async fn update_category(&self, id: u64, name: &str) -> Result<Category> {
        self.inner.update_category(id, name).await
    }

    async fn delete_category(&self, id: u64) -> Result<()> {
        self.inner.delete_category(id).await
    }
}
