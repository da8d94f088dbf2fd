//! Request DTOs for the event API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

use crate::error::{AppError, Result};

/// Accepted wire format for event dates, always UTC.
pub const EVENT_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Parses an event date in [`EVENT_DATE_FORMAT`].
pub fn parse_event_date(raw: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, EVENT_DATE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| AppError::InvalidRequest("invalid date format".to_string()))
}

/// Request body for POST /events
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventInput {
    pub name: String,
    pub description: String,
    pub category_id: u64,
    pub event_date: String,
    pub venue: String,
    pub price: f64,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateEventInput {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty()
            || self.description.trim().is_empty()
            || self.category_id == 0
            || self.event_date.is_empty()
            || self.venue.trim().is_empty()
        {
            return Some("Missing required fields".to_string());
        }
        if self.price < 0.0 {
            return Some("Price cannot be negative".to_string());
        }
        None
    }
}

/// Request body for PUT /events/:id. Absent fields are left unchanged;
/// `tags`, when present, replaces the event's whole tag set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<u64>,
    pub event_date: Option<String>,
    pub venue: Option<String>,
    pub price: Option<f64>,
    pub tags: Option<Vec<String>>,
}

/// Request body for POST /categories and PUT /categories/:id
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
}

impl CategoryInput {
    pub fn validate(&self) -> Option<String> {
        if self.name.trim().is_empty() {
            return Some("Category name cannot be empty".to_string());
        }
        None
    }
}

/// Query string for GET /events
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListEventsQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub category_id: Option<u64>,
}

/// Query string for GET /events/search
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchEventsQuery {
    #[serde(default)]
    pub q: String,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}
