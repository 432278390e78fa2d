use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use owo_colors::OwoColorize;
use podlight_core::slot::{BookingRequest, BookingTemplate};
use podlight_core::{EffectPolicy, Event};

use crate::calendar::CalendarSource;
use crate::config::Config;
use crate::render::Render;

use super::{decide, provider_calendar};

pub async fn run(config: &Config, force: bool) -> Result<()> {
    let calendar = provider_calendar(config)?;
    let policy = config.effects.policy()?;
    let template = config.booking.template()?;

    let event = book_next_slot(&calendar, &policy, &template, Utc::now(), force).await?;

    println!("{} {}", "Booked:".green(), event.render());
    if let Some(location) = &event.location {
        println!("   {}", location.dimmed());
    }

    Ok(())
}

/// Book `[now, now + 30 min)` unless the calendar says the slot is taken.
pub async fn book_next_slot(
    calendar: &impl CalendarSource,
    policy: &EffectPolicy,
    template: &BookingTemplate,
    now: DateTime<Utc>,
    force: bool,
) -> Result<Event> {
    let decision = decide(calendar, policy, now).await?;

    if !decision.can_book_next_slot {
        if !force {
            anyhow::bail!(
                "The next 30 minutes are not free.\n\
                Run `podlight status` to see why, or `podlight book --force` to book anyway."
            );
        }
        tracing::warn!("booking over a busy slot");
    }

    let request = BookingRequest::new(template, now);
    tracing::info!(
        summary = %request.event.summary,
        start = %request.event.start,
        time_zone = %request.time_zone,
        "booking"
    );

    calendar
        .book(request)
        .await
        .context("Failed to create booking")
}
