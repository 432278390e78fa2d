use anyhow::{Context, Result};
use google_calendar::types::OrderBy;
use podlight_core::Event;
use podlight_core::protocol::ListUpcoming;

use crate::google_event::FromGoogle;
use crate::remote_config::GoogleRemoteConfig;
use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let cmd: ListUpcoming = serde_json::from_value(params).context("Invalid params")?;
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;

    let client = Session::load_valid(&config.google_account).await?.client()?;

    let time_min = cmd.not_before.to_rfc3339();
    // No upper bound unless the CLI asks for one
    let time_max = cmd
        .not_after
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();

    // Recurring series are expanded into single instances so that the
    // ordering by start time is meaningful.
    let response = client
        .events()
        .list_all(
            &config.google_calendar_id,
            "",
            0,
            OrderBy::StartTime,
            &[],
            "", // search query
            &[],
            false, // show deleted
            false, // show hidden invitations
            true,  // single events
            &time_max,
            &time_min,
            "",
            "",
        )
        .await
        .context("Failed to fetch events")?;

    let events: Vec<Event> = response
        .body
        .into_iter()
        .map(Event::from_google)
        .filter(|event| !event.is_cancelled())
        .take(cmd.max_results)
        .collect();

    Ok(serde_json::to_value(events)?)
}
