//! Ad-hoc booking of the space.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::error::{PodlightError, PodlightResult};
use crate::event::{Event, EventStatus, EventTime, TimeWindow};

/// Length of an ad-hoc booking, in minutes.
pub const SLOT_MINUTES: i64 = 30;

pub const DEFAULT_BOOKING_SUMMARY: &str = "A Meeting";
pub const DEFAULT_BOOKING_LOCATION: &str = "This pod";
pub const DEFAULT_BOOKING_DESCRIPTION: &str = "Booked using a Candle!";
pub const DEFAULT_BOOKING_TIMEZONE: Tz = chrono_tz::Pacific::Auckland;

/// Whether a 30 minute booking fits between the current event and the next one.
///
/// The booking is anchored at the end of the current event, so with nothing in
/// progress there is no anchor and the answer is `false` unless there is
/// nothing coming up at all.
pub fn can_book_next_slot(current: Option<&Event>, next: Option<&Event>) -> bool {
    let Some(next) = next else {
        return true;
    };

    let Some(current) = current else {
        return false;
    };

    match (TimeWindow::of(current), TimeWindow::of(next)) {
        (Some(current), Some(next)) => current.gap_until(&next) >= Duration::minutes(SLOT_MINUTES),
        _ => false,
    }
}

/// Fixed texts and timezone used for every booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingTemplate {
    pub summary: String,
    pub location: String,
    pub description: String,
    pub timezone: Tz,
}

impl Default for BookingTemplate {
    fn default() -> Self {
        BookingTemplate {
            summary: DEFAULT_BOOKING_SUMMARY.to_string(),
            location: DEFAULT_BOOKING_LOCATION.to_string(),
            description: DEFAULT_BOOKING_DESCRIPTION.to_string(),
            timezone: DEFAULT_BOOKING_TIMEZONE,
        }
    }
}

impl BookingTemplate {
    /// Look up an IANA timezone name such as `Pacific/Auckland`.
    pub fn parse_timezone(name: &str) -> PodlightResult<Tz> {
        name.parse::<Tz>()
            .map_err(|_| PodlightError::InvalidTimezone(name.to_string()))
    }
}

/// A new event covering `[now, now + SLOT_MINUTES)`, ready to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    pub event: Event,
    /// IANA name of the timezone both timestamps are expressed in.
    pub time_zone: String,
}

impl BookingRequest {
    pub fn new(template: &BookingTemplate, now: DateTime<Utc>) -> Self {
        let tz = template.timezone;
        let start = now.with_timezone(&tz).fixed_offset();
        let end = (now + Duration::minutes(SLOT_MINUTES)).with_timezone(&tz).fixed_offset();

        BookingRequest {
            event: Event {
                id: String::new(),
                summary: template.summary.clone(),
                location: Some(template.location.clone()),
                description: Some(template.description.clone()),
                start: EventTime::DateTime(start),
                end: EventTime::DateTime(end),
                status: EventStatus::Confirmed,
            },
            time_zone: tz.name().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
    }

    fn timed(start: Duration, end: Duration) -> Event {
        Event {
            id: String::new(),
            summary: "Sync".to_string(),
            location: None,
            description: None,
            start: (now() + start).into(),
            end: (now() + end).into(),
            status: EventStatus::Confirmed,
        }
    }

    #[test]
    fn nothing_next_is_always_bookable() {
        let current = timed(Duration::minutes(-10), Duration::minutes(20));
        assert!(can_book_next_slot(Some(&current), None));
        assert!(can_book_next_slot(None, None));
    }

    #[test]
    fn nothing_current_cannot_anchor_a_booking() {
        let next = timed(Duration::hours(3), Duration::hours(4));
        assert!(!can_book_next_slot(None, Some(&next)));
    }

    #[test]
    fn short_gap_is_not_bookable() {
        let current = timed(Duration::minutes(-10), Duration::minutes(20));
        let next = timed(Duration::minutes(49), Duration::minutes(80));
        assert!(!can_book_next_slot(Some(&current), Some(&next)));
    }

    #[test]
    fn exactly_thirty_minutes_is_bookable() {
        let current = timed(Duration::minutes(-10), Duration::minutes(20));
        let next = timed(Duration::minutes(50), Duration::minutes(80));
        assert!(can_book_next_slot(Some(&current), Some(&next)));
    }

    #[test]
    fn long_gap_is_bookable() {
        let current = timed(Duration::minutes(-10), Duration::minutes(20));
        let next = timed(Duration::hours(3), Duration::minutes(210));
        assert!(can_book_next_slot(Some(&current), Some(&next)));
    }

    #[test]
    fn all_day_boundary_is_not_bookable() {
        let current = timed(Duration::minutes(-10), Duration::minutes(20));
        let mut next = timed(Duration::hours(3), Duration::hours(4));
        next.start = EventTime::parse("2025-06-03");
        assert!(!can_book_next_slot(Some(&current), Some(&next)));

        let mut current = current;
        current.end = EventTime::parse("2025-06-02");
        let next = timed(Duration::hours(3), Duration::hours(4));
        assert!(!can_book_next_slot(Some(&current), Some(&next)));
    }

    #[test]
    fn booking_covers_thirty_minutes_from_now() {
        let request = BookingRequest::new(&BookingTemplate::default(), now());
        let window = TimeWindow::of(&request.event).unwrap();

        assert_eq!(window.start, now());
        assert_eq!(window.end, now() + Duration::minutes(30));
        assert_eq!(request.event.summary, "A Meeting");
        assert_eq!(request.event.location.as_deref(), Some("This pod"));
        assert_eq!(request.event.description.as_deref(), Some("Booked using a Candle!"));
        assert!(request.event.id.is_empty());
    }

    #[test]
    fn booking_uses_template_timezone() {
        let request = BookingRequest::new(&BookingTemplate::default(), now());
        assert_eq!(request.time_zone, "Pacific/Auckland");

        // June is NZST, UTC+12.
        let EventTime::DateTime(start) = request.event.start else {
            panic!("booking start should be precise");
        };
        assert_eq!(start.offset().local_minus_utc(), 12 * 3600);
        assert_eq!(start.to_rfc3339(), "2025-06-02T21:00:00+12:00");
    }

    #[test]
    fn timezone_names_are_validated() {
        assert_eq!(
            BookingTemplate::parse_timezone("Europe/Berlin").unwrap(),
            chrono_tz::Europe::Berlin
        );
        assert!(matches!(
            BookingTemplate::parse_timezone("Mars/Olympus_Mons"),
            Err(PodlightError::InvalidTimezone(_))
        ));
    }
}
