//! In-process repository backed by ordered maps.
//!
//! Stores events with foreign keys and hydrates category and tags on read, the
//! same shape a relational backend would return.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::error::{AppError, Result};
use crate::models::{Category, Event, NewEvent, Tag};
use crate::repository::{sort_upcoming_first, EventRepository};

#[derive(Debug, Clone)]
struct EventRow {
    id: u64,
    name: String,
    description: String,
    category_id: u64,
    event_date: DateTime<Utc>,
    venue: String,
    price: f64,
    image_url: String,
    tag_ids: Vec<u64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    events: BTreeMap<u64, EventRow>,
    categories: BTreeMap<u64, Category>,
    tags: BTreeMap<u64, Tag>,
    next_event_id: u64,
    next_category_id: u64,
    next_tag_id: u64,
}

impl Tables {
    fn hydrate(&self, row: &EventRow) -> Result<Event> {
        let category = self
            .categories
            .get(&row.category_id)
            .cloned()
            .ok_or_else(|| AppError::category_not_found(row.category_id))?;
        let tags = row
            .tag_ids
            .iter()
            .filter_map(|id| self.tags.get(id).cloned())
            .collect();

        Ok(Event {
            id: row.id,
            name: row.name.clone(),
            description: row.description.clone(),
            category_id: row.category_id,
            category,
            event_date: row.event_date,
            venue: row.venue.clone(),
            price: row.price,
            image_url: row.image_url.clone(),
            tags,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }

    fn find_or_create_tag(&mut self, name: &str) -> u64 {
        if let Some(tag) = self.tags.values().find(|tag| tag.name == name) {
            return tag.id;
        }
        self.next_tag_id += 1;
        let now = Utc::now();
        let id = self.next_tag_id;
        self.tags.insert(
            id,
            Tag {
                id,
                name: name.to_string(),
                created_at: now,
                updated_at: now,
            },
        );
        id
    }

    fn ensure_unique_category(&self, name: &str, except: Option<u64>) -> Result<()> {
        let taken = self
            .categories
            .values()
            .any(|c| c.name == name && Some(c.id) != except);
        if taken {
            return Err(AppError::InvalidRequest(format!(
                "category '{}' already exists",
                name
            )));
        }
        Ok(())
    }
}

fn paginate(events: Vec<Event>, page: u32, page_size: u32) -> Vec<Event> {
    let offset = (page.max(1) as usize - 1) * page_size as usize;
    events
        .into_iter()
        .skip(offset)
        .take(page_size as usize)
        .collect()
}

// == Memory Repository ==
/// Event repository held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryEventRepository {
    tables: RwLock<Tables>,
}

impl MemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn create_event(&self, event: NewEvent) -> Result<Event> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&event.category_id) {
            return Err(AppError::category_not_found(event.category_id));
        }

        tables.next_event_id += 1;
        let now = Utc::now();
        let row = EventRow {
            id: tables.next_event_id,
            name: event.name,
            description: event.description,
            category_id: event.category_id,
            event_date: event.event_date,
            venue: event.venue,
            price: event.price,
            image_url: event.image_url,
            tag_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        let created = tables.hydrate(&row)?;
        tables.events.insert(row.id, row);
        Ok(created)
    }

    async fn get_event(&self, id: u64) -> Result<Event> {
        let tables = self.tables.read().await;
        let row = tables
            .events
            .get(&id)
            .ok_or_else(|| AppError::event_not_found(id))?;
        tables.hydrate(row)
    }

    async fn update_event(&self, event: &Event) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&event.category_id) {
            return Err(AppError::category_not_found(event.category_id));
        }
        let row = tables
            .events
            .get_mut(&event.id)
            .ok_or_else(|| AppError::event_not_found(event.id))?;

        row.name = event.name.clone();
        row.description = event.description.clone();
        row.category_id = event.category_id;
        row.event_date = event.event_date;
        row.venue = event.venue.clone();
        row.price = event.price;
        row.image_url = event.image_url.clone();
        row.updated_at = Utc::now();
        Ok(())
    }

    async fn delete_event(&self, id: u64) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables
            .events
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::event_not_found(id))
    }

    async fn replace_event_tags(&self, id: u64, names: &[String]) -> Result<()> {
        let mut tables = self.tables.write().await;
        if !tables.events.contains_key(&id) {
            return Err(AppError::event_not_found(id));
        }

        let mut tag_ids = Vec::new();
        for name in names.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
            let tag_id = tables.find_or_create_tag(name);
            if !tag_ids.contains(&tag_id) {
                tag_ids.push(tag_id);
            }
        }

        if let Some(row) = tables.events.get_mut(&id) {
            row.tag_ids = tag_ids;
        }
        Ok(())
    }

    async fn list_events(
        &self,
        page: u32,
        page_size: u32,
        category_id: Option<u64>,
    ) -> Result<(Vec<Event>, u64)> {
        let tables = self.tables.read().await;
        let mut events = tables
            .events
            .values()
            .filter(|row| category_id.map_or(true, |id| row.category_id == id))
            .map(|row| tables.hydrate(row))
            .collect::<Result<Vec<_>>>()?;

        sort_upcoming_first(&mut events, &Utc::now());
        let total = events.len() as u64;
        Ok((paginate(events, page, page_size), total))
    }

    async fn search_events(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<(Vec<Event>, u64)> {
        let needle = query.to_lowercase();
        let tables = self.tables.read().await;
        let events = tables
            .events
            .values()
            .filter(|row| row.name.to_lowercase().contains(&needle))
            .map(|row| tables.hydrate(row))
            .collect::<Result<Vec<_>>>()?;

        let total = events.len() as u64;
        Ok((paginate(events, page, page_size), total))
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().cloned().collect())
    }

    async fn get_category(&self, id: u64) -> Result<Category> {
        let tables = self.tables.read().await;
        tables
            .categories
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::category_not_found(id))
    }

    async fn create_category(&self, name: &str) -> Result<Category> {
        let mut tables = self.tables.write().await;
        tables.ensure_unique_category(name, None)?;

        tables.next_category_id += 1;
        let now = Utc::now();
        let category = Category {
            id: tables.next_category_id,
            name: name.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update_category(&self, id: u64, name: &str) -> Result<Category> {
        let mut tables = self.tables.write().await;
        tables.ensure_unique_category(name, Some(id))?;

        let category = tables
            .categories
            .get_mut(&id)
            .ok_or_else(|| AppError::category_not_found(id))?;
        category.name = name.to_string();
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn delete_category(&self, id: u64) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.events.values().any(|row| row.category_id == id) {
            return Err(AppError::InvalidRequest(format!(
                "category {} still has events",
                id
            )));
        }
        tables
            .categories
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::category_not_found(id))
    }
}
