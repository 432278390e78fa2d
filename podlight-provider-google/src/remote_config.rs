//! Google-specific remote configuration.
//!
//! The CLI forwards whatever provider keys the `[calendar]` config section
//! holds; this gives them a type on the provider side.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Google's alias for the user's main calendar
pub const DEFAULT_CALENDAR_ID: &str = "primary";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleRemoteConfig {
    pub google_account: String,
    pub google_calendar_id: String,
}

impl TryFrom<&serde_json::Map<String, serde_json::Value>> for GoogleRemoteConfig {
    type Error = anyhow::Error;

    fn try_from(map: &serde_json::Map<String, serde_json::Value>) -> Result<Self> {
        let google_account = map
            .get("google_account")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("Missing required field: google_account"))?
            .to_string();

        let google_calendar_id = map
            .get("google_calendar_id")
            .and_then(|v| v.as_str())
            .unwrap_or(DEFAULT_CALENDAR_ID)
            .to_string();

        Ok(Self {
            google_account,
            google_calendar_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
        match value {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn calendar_defaults_to_primary() {
        let config =
            GoogleRemoteConfig::try_from(&map(json!({ "google_account": "me@example.com" })))
                .unwrap();
        assert_eq!(config.google_calendar_id, "primary");
    }

    #[test]
    fn account_is_required() {
        let result = GoogleRemoteConfig::try_from(&map(json!({ "google_calendar_id": "room" })));
        assert!(result.is_err());
    }
}
