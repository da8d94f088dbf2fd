//! Background Tasks Module
//!
//! Periodic tasks owned by the cache layer.
//!
//! # Tasks
//! - Sweep: physically removes expired store entries
//! - Refresh: warms, then periodically rebuilds, the recent events view

mod refresh;
mod sweep;

pub use refresh::spawn_refresh_task;
pub use sweep::spawn_sweep_task;
