//! Defines the JSON protocols podlight speaks with its collaborators.
//!
//! Calendar providers (`podlight-provider-{name}`) get one request line on
//! stdin and answer with one response line on stdout, then exit.
//!
//! Light drivers (`podlight-light-{name}`) stay alive for the whole run and
//! answer every [`DriverRequest`] line with one [`Response`] line.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::effect::Effect;
use crate::event::Event;

pub trait ProviderCommand: Serialize {
    type Response: DeserializeOwned;
    fn command() -> Command;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    Authenticate,
    ListUpcoming,
    CreateEvent,
}

/// Request sent from CLI to provider.
#[derive(Debug, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    #[serde(default)]
    pub params: serde_json::Value,
}

/// Response sent from provider or driver to CLI.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Response<T> {
    Success { data: T },
    Error { error: String },
}

impl<T: Serialize> Response<T> {
    pub fn success(data: T) -> String {
        serde_json::to_string(&Response::Success { data })
            .unwrap_or_else(|e| Response::error(&format!("Failed to serialize response: {e}")))
    }
}

impl Response<()> {
    pub fn error(msg: &str) -> String {
        serde_json::json!({ "status": "error", "error": msg }).to_string()
    }
}

/// Run the provider's interactive sign-in.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Authenticate {}

impl ProviderCommand for Authenticate {
    type Response = String; // Account identifier (e.g., email)
    fn command() -> Command {
        Command::Authenticate
    }
}

/// The soonest events ending after `not_before`, and starting before
/// `not_after` when it is set.
///
/// Providers expand recurring series into single instances, leave out
/// cancelled events and return at most `max_results` events ordered by start.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListUpcoming {
    /// Provider-specific config (e.g., google_account, google_calendar_id)
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub not_before: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_after: Option<DateTime<Utc>>,
    pub max_results: usize,
}

impl ProviderCommand for ListUpcoming {
    type Response = Vec<Event>;
    fn command() -> Command {
        Command::ListUpcoming
    }
}

/// Insert a new event.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateEvent {
    #[serde(flatten)]
    pub remote_config: serde_json::Map<String, serde_json::Value>,
    pub event: Event,
    /// IANA timezone the event's timestamps should be shown in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl ProviderCommand for CreateEvent {
    type Response = Event;
    fn command() -> Command {
        Command::CreateEvent
    }
}

/// Requests sent to a light driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum DriverRequest {
    Connect { device: String },
    ApplyEffect { effect: Effect },
    Disconnect,
}
