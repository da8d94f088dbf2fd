//! Domain records as returned by the repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Event category. Names are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Free-form label attached to events. Names are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An event hydrated with its category and tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub category_id: u64,
    pub category: Category,
    pub event_date: DateTime<Utc>,
    pub venue: String,
    pub price: f64,
    pub image_url: String,
    pub tags: Vec<Tag>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields needed to persist a new event.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub name: String,
    pub description: String,
    pub category_id: u64,
    pub event_date: DateTime<Utc>,
    pub venue: String,
    pub price: f64,
    pub image_url: String,
}
