//! Where upcoming events come from.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use podlight_core::protocol::{CreateEvent, ListUpcoming};
use podlight_core::provider::Provider;
use podlight_core::slot::BookingRequest;
use podlight_core::{Event, PodlightError, PodlightResult};

use crate::config::Config;

#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// The soonest events that have not ended yet, ordered by start.
    async fn list_upcoming(&self, now: DateTime<Utc>) -> PodlightResult<Vec<Event>>;

    /// Put a booking on the calendar and return the event as stored.
    async fn book(&self, request: BookingRequest) -> PodlightResult<Event>;
}

/// A calendar backed by a `podlight-provider-{name}` binary.
pub struct ProviderCalendar {
    provider: Provider,
    remote_config: serde_json::Map<String, serde_json::Value>,
    lookahead: Option<chrono::Duration>,
    max_results: usize,
}

impl ProviderCalendar {
    pub fn from_config(config: &Config) -> PodlightResult<Self> {
        let lookahead = config
            .lookahead
            .map(chrono::Duration::from_std)
            .transpose()
            .map_err(|_| PodlightError::Config("lookahead is too large".into()))?;

        Ok(ProviderCalendar {
            provider: Provider::from_name(&config.calendar.provider)
                .with_timeout(config.collaborator_timeout),
            remote_config: config.calendar.remote_config(),
            lookahead,
            max_results: config.max_results,
        })
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    fn list_request(&self, now: DateTime<Utc>) -> ListUpcoming {
        ListUpcoming {
            remote_config: self.remote_config.clone(),
            not_before: now,
            not_after: self.lookahead.map(|lookahead| now + lookahead),
            max_results: self.max_results,
        }
    }
}

#[async_trait]
impl CalendarSource for ProviderCalendar {
    async fn list_upcoming(&self, now: DateTime<Utc>) -> PodlightResult<Vec<Event>> {
        self.provider.call(self.list_request(now)).await
    }

    async fn book(&self, request: BookingRequest) -> PodlightResult<Event> {
        self.provider
            .call(CreateEvent {
                remote_config: self.remote_config.clone(),
                event: request.event,
                time_zone: Some(request.time_zone),
            })
            .await
    }
}
