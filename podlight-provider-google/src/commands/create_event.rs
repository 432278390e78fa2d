use anyhow::{Context, Result};
use google_calendar::types::SendUpdates;
use podlight_core::Event;
use podlight_core::protocol::CreateEvent;

use crate::google_event::{FromGoogle, ToGoogle};
use crate::remote_config::GoogleRemoteConfig;
use crate::session::Session;

pub async fn handle(params: serde_json::Value) -> Result<serde_json::Value> {
    let cmd: CreateEvent = serde_json::from_value(params).context("Invalid params")?;
    let config = GoogleRemoteConfig::try_from(&cmd.remote_config)?;

    let client = Session::load_valid(&config.google_account).await?.client()?;

    // Let google assign the ID
    let mut google_event = cmd.event.to_google(cmd.time_zone.as_deref());
    google_event.id = String::new();

    let response = client
        .events()
        .insert(
            &config.google_calendar_id,
            0,
            0,
            false,
            SendUpdates::None,
            false,
            &google_event,
        )
        .await
        .with_context(|| format!("Failed to create event: {}", &google_event.summary))?;

    let created_event = Event::from_google(response.body);

    Ok(serde_json::to_value(created_event)?)
}
