//! Cache key naming for the event read path.

/// Key of the single aggregate "recent events" view.
pub const RECENT_EVENTS_KEY: &str = "recent_events";

/// Key of one cached event projection.
pub fn event_key(id: u64) -> String {
    format!("event_{}", id)
}
