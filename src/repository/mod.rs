//! Persistent store boundary.
//!
//! The service only talks to storage through [`EventRepository`]. Listings come
//! back hydrated with category and tags, ordered by [`upcoming_first`].

mod memory;
mod ordering;

#[cfg(test)]
pub(crate) mod testing;

pub use memory::MemoryEventRepository;
pub use ordering::{sort_upcoming_first, upcoming_first};

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Category, Event, NewEvent};

/// Storage operations for events, categories and tags.
///
/// Missing records are reported as `AppError::NotFound`; any other storage
/// failure as `AppError::Upstream`.
#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create_event(&self, event: NewEvent) -> Result<Event>;

    async fn get_event(&self, id: u64) -> Result<Event>;

    /// Persists the scalar fields and category of `event`. Tags are untouched.
    async fn update_event(&self, event: &Event) -> Result<()>;

    async fn delete_event(&self, id: u64) -> Result<()>;

    /// Replaces the event's tags, creating unknown tag names on the fly.
    /// Names are trimmed; blank names are skipped.
    async fn replace_event_tags(&self, id: u64, names: &[String]) -> Result<()>;

    /// One page of events (1-based `page`), upcoming first, plus the total
    /// number of matching events.
    async fn list_events(
        &self,
        page: u32,
        page_size: u32,
        category_id: Option<u64>,
    ) -> Result<(Vec<Event>, u64)>;

    /// Case-insensitive substring match on the event name.
    async fn search_events(&self, query: &str, page: u32, page_size: u32)
        -> Result<(Vec<Event>, u64)>;

    async fn list_categories(&self) -> Result<Vec<Category>>;

    async fn get_category(&self, id: u64) -> Result<Category>;

    async fn create_category(&self, name: &str) -> Result<Category>;

    async fn update_category(&self, id: u64, name: &str) -> Result<Category>;

    async fn delete_category(&self, id: u64) -> Result<()>;
}
