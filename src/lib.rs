//! Mawid - event listing backend
//!
//! Serves event listings through an in-process expiring cache that is
//! refreshed on a schedule and invalidated on every write.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheCoordinator, CacheSettings};
pub use config::Config;
pub use repository::{EventRepository, MemoryEventRepository};
pub use services::EventService;
