use podlight_core::{Event, EventStatus, EventTime};

pub trait FromGoogle {
    fn from_google(event: google_calendar::types::Event) -> Self;
}

impl FromGoogle for Event {
    /// Events with a missing or odd start/end are still converted: the time
    /// becomes [`EventTime::Unparsed`] so the event is listed but never
    /// used for scheduling.
    fn from_google(event: google_calendar::types::Event) -> Self {
        let status = match event.status.as_str() {
            "tentative" => EventStatus::Tentative,
            "cancelled" => EventStatus::Cancelled,
            _ => EventStatus::Confirmed,
        };

        Event {
            id: event.id,
            summary: event.summary,
            location: non_empty(event.location),
            description: non_empty(event.description),
            start: event_time_from_google(event.start.as_ref()),
            end: event_time_from_google(event.end.as_ref()),
            status,
        }
    }
}

fn event_time_from_google(time: Option<&google_calendar::types::EventDateTime>) -> EventTime {
    match time {
        Some(t) => match (t.date_time, t.date) {
            (Some(dt), _) => EventTime::from(dt),
            (None, Some(d)) => EventTime::Date(d),
            (None, None) => EventTime::Unparsed(String::new()),
        },
        None => EventTime::Unparsed(String::new()),
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}
