//! Response DTOs for the event API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::models::{Category, Event, Tag};

/// Envelope wrapping every JSON body the API returns.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            error: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: None,
            error: None,
        }
    }

    pub fn failure(message: impl Into<String>, error: Option<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            error,
        }
    }
}

/// Event projection served by the read path and held in the cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventResponse {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub event_date: DateTime<Utc>,
    pub venue: String,
    pub price: f64,
    pub image_url: String,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            name: event.name,
            description: event.description,
            category: event.category,
            event_date: event.event_date,
            venue: event.venue,
            price: event.price,
            image_url: event.image_url,
            tags: event.tags,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

/// One page of events.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaginatedEvents {
    pub events: Vec<EventResponse>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

impl PaginatedEvents {
    /// Builds a page; `total_pages` is at least 1.
    pub fn new(events: Vec<Event>, total: u64, page: u32, page_size: u32) -> Self {
        let total_pages = if total > 0 && page_size > 0 {
            total.div_ceil(u64::from(page_size)) as u32
        } else {
            1
        };

        Self {
            events: events.into_iter().map(EventResponse::from).collect(),
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

/// Response body for the stats endpoint (GET /api/v1/cache/stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub populates: u64,
    pub populate_failures: u64,
    /// Entries physically held, including expired ones awaiting a sweep
    pub total_entries: usize,
    pub swept_entries: u64,
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: &CacheStats, total_entries: usize, swept_entries: u64) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            populates: stats.populates,
            populate_failures: stats.populate_failures,
            total_entries,
            swept_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
