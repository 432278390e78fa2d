//! One polling cycle's worth of decisions.

use chrono::{DateTime, Utc};

use crate::effect::{Effect, EffectPolicy};
use crate::event::Event;
use crate::slot::can_book_next_slot;
use crate::window::{current_event, future_events, next_event, sort_events};

/// Everything derived from a single fetch of upcoming events.
///
/// Nothing carries over between cycles: a new `Decision` is computed from
/// scratch every time.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub now: DateTime<Utc>,
    /// All events that were considered, ordered by start.
    pub events: Vec<Event>,
    pub future_events: Vec<Event>,
    pub current_event: Option<Event>,
    pub next_event: Option<Event>,
    pub can_book_next_slot: bool,
    /// `None` when there are no future events; the light is left as is.
    pub effect: Option<Effect>,
}

impl Decision {
    pub fn compute(mut events: Vec<Event>, now: DateTime<Utc>, policy: &EffectPolicy) -> Self {
        events.retain(|event| !event.is_cancelled());
        sort_events(&mut events);

        let future = future_events(&events, now);
        let current = current_event(&events, now).cloned();
        let next = next_event(&future).cloned();

        let can_book = can_book_next_slot(current.as_ref(), next.as_ref());

        let effect = next
            .as_ref()
            .map(|next| policy.effect_from_event(next, now, can_book));

        Decision {
            now,
            events,
            future_events: future,
            current_event: current,
            next_event: next,
            can_book_next_slot: can_book,
            effect,
        }
    }

    pub fn has_upcoming_events(&self) -> bool {
        !self.future_events.is_empty()
    }
}
