pub mod auth;
pub mod book;
pub mod init;
pub mod run;
pub mod status;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use podlight_core::{Decision, EffectPolicy};

use crate::calendar::{CalendarSource, ProviderCalendar};
use crate::config::Config;

/// Provider-backed calendar for the configured provider, failing early if
/// its binary is missing.
pub fn provider_calendar(config: &Config) -> Result<ProviderCalendar> {
    let calendar = ProviderCalendar::from_config(config)?;
    calendar.provider().ensure_installed()?;
    Ok(calendar)
}

/// A single look at the calendar, outside the polling loop.
pub async fn decide(
    calendar: &impl CalendarSource,
    policy: &EffectPolicy,
    now: DateTime<Utc>,
) -> Result<Decision> {
    let events = calendar
        .list_upcoming(now)
        .await
        .context("Failed to fetch upcoming events")?;
    Ok(Decision::compute(events, now, policy))
}
