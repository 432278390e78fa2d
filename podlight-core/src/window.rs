//! Which events are in progress and which are coming up.
//!
//! All functions expect `events` ordered by start. Callers that cannot vouch
//! for the order of their input run [`sort_events`] first.

use chrono::{DateTime, Utc};

use crate::event::{Event, TimeWindow};

/// Stable sort by start time. All-day events sort at midnight UTC of their
/// date, events with an unparsed start go last.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by_key(|event| match event.start.sort_key() {
        Some(start) => (false, Some(start)),
        None => (true, None),
    });
}

/// Schedulable events starting strictly after `now`, in input order.
///
/// All-day and unparsed events are never included.
pub fn future_events(events: &[Event], now: DateTime<Utc>) -> Vec<Event> {
    events
        .iter()
        .filter(|event| TimeWindow::of(event).is_some_and(|window| window.starts_after(now)))
        .cloned()
        .collect()
}

/// The first schedulable event with `start <= now < end`.
///
/// Overlapping events are not an error: the first one in input order wins.
pub fn current_event(events: &[Event], now: DateTime<Utc>) -> Option<&Event> {
    events
        .iter()
        .find(|event| TimeWindow::of(event).is_some_and(|window| window.contains(now)))
}

/// The soonest of the future events.
pub fn next_event(future: &[Event]) -> Option<&Event> {
    future.first()
}
