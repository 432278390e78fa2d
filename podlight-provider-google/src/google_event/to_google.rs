use podlight_core::{Event, EventStatus, EventTime};

pub trait ToGoogle {
    fn to_google(&self, time_zone: Option<&str>) -> google_calendar::types::Event;
}

impl ToGoogle for Event {
    fn to_google(&self, time_zone: Option<&str>) -> google_calendar::types::Event {
        let status = match self.status {
            EventStatus::Confirmed => "confirmed".to_string(),
            EventStatus::Tentative => "tentative".to_string(),
            EventStatus::Cancelled => "cancelled".to_string(),
        };

        google_calendar::types::Event {
            id: self.id.clone(),
            summary: self.summary.clone(),
            description: self.description.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
            start: Some(event_time_to_google(&self.start, time_zone)),
            end: Some(event_time_to_google(&self.end, time_zone)),
            status,
            ..Default::default()
        }
    }
}

fn event_time_to_google(
    time: &EventTime,
    time_zone: Option<&str>,
) -> google_calendar::types::EventDateTime {
    let time_zone = time_zone.unwrap_or_default().to_string();

    match time {
        EventTime::DateTime(dt) => google_calendar::types::EventDateTime {
            date: None,
            date_time: Some(dt.with_timezone(&chrono::Utc)),
            time_zone,
        },
        EventTime::Date(d) => google_calendar::types::EventDateTime {
            date: Some(*d),
            date_time: None,
            time_zone: String::new(),
        },
        EventTime::Unparsed(_) => google_calendar::types::EventDateTime {
            date: None,
            date_time: None,
            time_zone,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use podlight_core::slot::{BookingRequest, BookingTemplate};

    #[test]
    fn booking_carries_timezone_on_both_ends() {
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let request = BookingRequest::new(&BookingTemplate::default(), now);

        let google = request.event.to_google(Some(&request.time_zone));

        let start = google.start.unwrap();
        let end = google.end.unwrap();
        assert_eq!(start.time_zone, "Pacific/Auckland");
        assert_eq!(end.time_zone, "Pacific/Auckland");
        assert_eq!(start.date_time, Some(now));
        assert_eq!(end.date_time, Some(now + Duration::minutes(30)));
        assert_eq!(google.summary, "A Meeting");
        assert_eq!(google.location, "This pod");
        assert_eq!(google.description, "Booked using a Candle!");
        assert_eq!(google.status, "confirmed");
    }
}
