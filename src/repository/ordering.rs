//! Upcoming-first ordering used by every event listing.
//!
//! Events at or after `now` come first, soonest first. Past events follow,
//! most recently elapsed first. This is two buckets with opposite time
//! directions, not one monotonic sort key.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::models::Event;

/// Compares two event dates relative to `now`.
pub fn upcoming_first(a: &DateTime<Utc>, b: &DateTime<Utc>, now: &DateTime<Utc>) -> Ordering {
    let a_upcoming = a >= now;
    let b_upcoming = b >= now;

    match (a_upcoming, b_upcoming) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (true, true) => a.cmp(b),
        (false, false) => b.cmp(a),
    }
}

/// Sorts events in place, breaking date ties by id so pages are stable.
pub fn sort_upcoming_first(events: &mut [Event], now: &DateTime<Utc>) {
    events.sort_by(|a, b| upcoming_first(&a.event_date, &b.event_date, now).then(a.id.cmp(&b.id)));
}
