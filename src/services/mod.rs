//! Service layer between the HTTP handlers and the repository.

mod events;

pub use events::{normalize_pagination, EventService, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
