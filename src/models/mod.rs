//! Domain records and the DTOs used for HTTP request/response bodies.

pub mod event;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use event::{Category, Event, NewEvent, Tag};
pub use requests::{
    parse_event_date, CategoryInput, CreateEventInput, ListEventsQuery, SearchEventsQuery,
    UpdateEventInput,
};
pub use responses::{ApiResponse, EventResponse, HealthResponse, PaginatedEvents, StatsResponse};
