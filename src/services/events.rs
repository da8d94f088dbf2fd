//! Event service: the read and write paths in front of the repository.
//!
//! Single-event and recent-events reads go through the cache coordinator.
//! Every successful write invalidates the affected cache keys before it
//! returns; the recent view is rebuilt in the background.

use std::sync::Arc;

use tracing::info;

use crate::cache::CacheCoordinator;
use crate::error::{AppError, Result};
use crate::models::{
    parse_event_date, Category, CreateEventInput, EventResponse, NewEvent, PaginatedEvents,
    UpdateEventInput,
};
use crate::repository::EventRepository;

/// Default page size when the caller passes none or an invalid one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Largest page size a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Clamps caller-supplied paging to a valid 1-based page and a bounded size.
pub fn normalize_pagination(page: Option<i64>, page_size: Option<i64>) -> (u32, u32) {
    let page = page.filter(|p| *p >= 1).unwrap_or(1).min(u32::MAX as i64) as u32;
    let page_size = match page_size {
        Some(size) if size < 1 => DEFAULT_PAGE_SIZE,
        Some(size) if size > MAX_PAGE_SIZE as i64 => MAX_PAGE_SIZE,
        Some(size) => size as u32,
        None => DEFAULT_PAGE_SIZE,
    };
    (page, page_size)
}

#[derive(Clone)]
pub struct EventService {
    repo: Arc<dyn EventRepository>,
    cache: Arc<CacheCoordinator>,
}

impl EventService {
    pub fn new(repo: Arc<dyn EventRepository>, cache: Arc<CacheCoordinator>) -> Self {
        Self { repo, cache }
    }

    pub fn cache(&self) -> &Arc<CacheCoordinator> {
        &self.cache
    }

    // == Read Path ==

    pub async fn get_event_by_id(&self, id: u64) -> Result<Arc<EventResponse>> {
        self.cache.get_entity(id).await
    }

    pub async fn get_recent_events(&self) -> Result<Arc<PaginatedEvents>> {
        self.cache.get_recent().await
    }

    pub async fn list_events(
        &self,
        page: Option<i64>,
        page_size: Option<i64>,
        category_id: Option<u64>,
    ) -> Result<PaginatedEvents> {
        let (page, page_size) = normalize_pagination(page, page_size);
        let category_id = category_id.filter(|id| *id != 0);

        let (events, total) = self.repo.list_events(page, page_size, category_id).await?;
        Ok(PaginatedEvents::new(events, total, page, page_size))
    }

    pub async fn search_events(
        &self,
        query: &str,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<PaginatedEvents> {
        let (page, page_size) = normalize_pagination(page, page_size);

        let (events, total) = self.repo.search_events(query, page, page_size).await?;
        Ok(PaginatedEvents::new(events, total, page, page_size))
    }

    // == Write Path ==

    pub async fn create_event(&self, input: CreateEventInput) -> Result<EventResponse> {
        if let Some(message) = input.validate() {
            return Err(AppError::InvalidRequest(message));
        }
        let event_date = parse_event_date(&input.event_date)?;
        self.repo.get_category(input.category_id).await?;

        let created = self
            .repo
            .create_event(NewEvent {
                name: input.name,
                description: input.description,
                category_id: input.category_id,
                event_date,
                venue: input.venue,
                price: input.price,
                image_url: String::new(),
            })
            .await?;
        // The row is committed from here on
        self.cache.invalidate_recent_and_refresh();
        info!(id = created.id, "Event created");

        if !input.tags.is_empty() {
            self.repo.replace_event_tags(created.id, &input.tags).await?;
            // A rebuild may have run between the insert and the tags
            self.cache.invalidate_recent_and_refresh();
        }

        let complete = self.repo.get_event(created.id).await?;
        Ok(EventResponse::from(complete))
    }

    pub async fn update_event(&self, id: u64, input: UpdateEventInput) -> Result<EventResponse> {
        let mut event = self.repo.get_event(id).await?;

        if let Some(name) = input.name.filter(|n| !n.trim().is_empty()) {
            event.name = name;
        }
        if let Some(description) = input.description.filter(|d| !d.trim().is_empty()) {
            event.description = description;
        }
        if let Some(category_id) = input.category_id.filter(|id| *id != 0) {
            event.category = self.repo.get_category(category_id).await?;
            event.category_id = category_id;
        }
        if let Some(raw) = input.event_date.filter(|d| !d.is_empty()) {
            event.event_date = parse_event_date(&raw)?;
        }
        if let Some(venue) = input.venue.filter(|v| !v.trim().is_empty()) {
            event.venue = venue;
        }
        if let Some(price) = input.price {
            if price < 0.0 {
                return Err(AppError::InvalidRequest(
                    "Price cannot be negative".to_string(),
                ));
            }
            event.price = price;
        }

        self.repo.update_event(&event).await?;
        self.cache.invalidate_entity(id);
        self.cache.invalidate_recent_and_refresh();
        info!(id, "Event updated");

        if let Some(tags) = &input.tags {
            self.repo.replace_event_tags(id, tags).await?;
            // Copies cached between the row update and the tag swap carry old tags
            self.cache.invalidate_entity(id);
            self.cache.invalidate_recent_and_refresh();
        }

        let fresh = self.repo.get_event(id).await?;
        Ok(EventResponse::from(fresh))
    }

    pub async fn delete_event(&self, id: u64) -> Result<()> {
        self.repo.delete_event(id).await?;

        self.cache.invalidate_entity(id);
        self.cache.invalidate_recent_and_refresh();
        info!(id, "Event deleted");
        Ok(())
    }

    // == Categories ==

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.repo.list_categories().await
    }

    pub async fn get_category(&self, id: u64) -> Result<Category> {
        self.repo.get_category(id).await
    }

    pub async fn create_category(&self, name: &str) -> Result<Category> {
        self.repo.create_category(name.trim()).await
    }

    pub async fn update_category(&self, id: u64, name: &str) -> Result<Category> {
        let category = self.repo.update_category(id, name.trim()).await?;
        // Cached events embed their category
        self.cache.clear();
        self.cache.invalidate_recent_and_refresh();
        Ok(category)
    }

    /// Deletes a category after deleting each of its events through
    /// [`EventService::delete_event`], so every event's cache entry is dropped.
    pub async fn delete_category(&self, id: u64) -> Result<()> {
        let category = self.repo.get_category(id).await?;

        let mut deleted = 0usize;
        loop {
            let (events, _) = self.repo.list_events(1, MAX_PAGE_SIZE, Some(id)).await?;
            if events.is_empty() {
                break;
            }
            for event in events {
                self.delete_event(event.id).await?;
                deleted += 1;
            }
        }

        self.repo.delete_category(id).await?;
        info!(
            "Deleted category {} (ID: {}) with {} associated events",
            category.name, category.id, deleted
        );
        Ok(())
    }
}
