//! Provider-neutral event types.
//!
//! Providers convert their API responses into these types, and the podlight
//! CLI works exclusively with them when deciding which effect to show.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A calendar event (provider-neutral)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Provider-assigned identifier. Empty for events not yet created.
    #[serde(default)]
    pub id: String,
    pub summary: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub start: EventTime,
    pub end: EventTime,
    #[serde(default)]
    pub status: EventStatus,
}

impl Event {
    /// Whether both ends of the event are precise instants.
    pub fn is_schedulable(&self) -> bool {
        TimeWindow::of(self).is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == EventStatus::Cancelled
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.summary, self.start)
    }
}

/// Start or end of an event.
///
/// All-day events only carry a date. Timestamps the provider could not make
/// sense of are kept verbatim so the event can still be listed; such events
/// never take part in scheduling decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTime {
    DateTime(DateTime<FixedOffset>),
    Date(NaiveDate),
    Unparsed(String),
}

impl EventTime {
    /// Parse an RFC 3339 timestamp or an ISO `YYYY-MM-DD` date.
    ///
    /// Never fails: unrecognised input becomes [`EventTime::Unparsed`].
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            EventTime::DateTime(dt)
        } else if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            EventTime::Date(date)
        } else {
            EventTime::Unparsed(s.to_string())
        }
    }

    /// The precise instant, if this is not an all-day or unparsed time.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            EventTime::DateTime(dt) => Some(dt.with_timezone(&Utc)),
            EventTime::Date(_) | EventTime::Unparsed(_) => None,
        }
    }

    /// Key used to order events by start. All-day events sort at midnight UTC
    /// of their date; unparsed times sort after everything else.
    pub(crate) fn sort_key(&self) -> Option<DateTime<Utc>> {
        match self {
            EventTime::DateTime(dt) => Some(dt.with_timezone(&Utc)),
            EventTime::Date(d) => d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()),
            EventTime::Unparsed(_) => None,
        }
    }
}

impl fmt::Display for EventTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventTime::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            EventTime::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            EventTime::Unparsed(raw) => write!(f, "{}", raw),
        }
    }
}

impl From<DateTime<Utc>> for EventTime {
    fn from(dt: DateTime<Utc>) -> Self {
        EventTime::DateTime(dt.fixed_offset())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    #[default]
    Confirmed,
    Tentative,
    Cancelled,
}

/// The precise `[start, end)` span of a schedulable event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Build the window of an event, or `None` if either end is not a precise instant.
    pub fn of(event: &Event) -> Option<Self> {
        Some(TimeWindow {
            start: event.start.instant()?,
            end: event.end.instant()?,
        })
    }

    /// `start <= now < end`, compared in whole seconds.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        let now = now.timestamp();
        self.start.timestamp() <= now && now < self.end.timestamp()
    }

    /// Whether the window starts strictly after `now`, compared in whole seconds.
    pub fn starts_after(&self, now: DateTime<Utc>) -> bool {
        self.start.timestamp() > now.timestamp()
    }

    /// Time between the end of this window and the start of `next`.
    /// Negative when they overlap.
    pub fn gap_until(&self, next: &TimeWindow) -> Duration {
        next.start - self.end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(start: EventTime, end: EventTime) -> Event {
        Event {
            id: String::new(),
            summary: "Standup".to_string(),
            location: None,
            description: None,
            start,
            end,
            status: EventStatus::Confirmed,
        }
    }

    #[test]
    fn parse_rfc3339_keeps_offset() {
        let time = EventTime::parse("2025-03-20T15:00:00+13:00");
        let expected = Utc.with_ymd_and_hms(2025, 3, 20, 2, 0, 0).unwrap();
        assert_eq!(time.instant(), Some(expected));
        assert_eq!(time.to_string(), "2025-03-20T15:00:00+13:00");
    }

    #[test]
    fn parse_date_only_is_all_day() {
        let time = EventTime::parse("2025-03-20");
        assert_eq!(time, EventTime::Date(NaiveDate::from_ymd_opt(2025, 3, 20).unwrap()));
        assert_eq!(time.instant(), None);
    }

    #[test]
    fn parse_garbage_is_kept_verbatim() {
        let time = EventTime::parse("next tuesday-ish");
        assert_eq!(time, EventTime::Unparsed("next tuesday-ish".to_string()));
        assert_eq!(time.instant(), None);
    }

    #[test]
    fn window_requires_precise_ends() {
        let start = Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap();
        let timed = event(start.into(), (start + Duration::minutes(30)).into());
        assert!(timed.is_schedulable());

        let all_day = event(
            EventTime::parse("2025-03-20"),
            EventTime::parse("2025-03-21"),
        );
        assert!(!all_day.is_schedulable());

        let broken = event(start.into(), EventTime::parse("soon"));
        assert!(!broken.is_schedulable());
    }

    #[test]
    fn window_contains_is_half_open() {
        let start = Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap();
        let end = start + Duration::minutes(30);
        let window = TimeWindow { start, end };

        assert!(window.contains(start));
        assert!(window.contains(end - Duration::seconds(1)));
        assert!(!window.contains(end));
        assert!(!window.contains(start - Duration::seconds(1)));
    }

    #[test]
    fn window_compares_whole_seconds() {
        let start = Utc.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap() + Duration::milliseconds(700);
        let window = TimeWindow {
            start,
            end: start + Duration::minutes(30),
        };

        // Same second as the start: already begun, not in the future.
        let now = start - Duration::milliseconds(500);
        assert!(window.contains(now));
        assert!(!window.starts_after(now));
    }

    #[test]
    fn event_time_serializes_tagged() {
        let json = serde_json::to_string(&EventTime::parse("2025-03-20")).unwrap();
        assert_eq!(json, r#"{"date":"2025-03-20"}"#);
    }
}
