//! podlight configuration at ~/.config/podlight/config.toml
//!
//! Every key except `[calendar]` has a default. Any key can be overridden
//! from the environment, e.g. `PODLIGHT_POLL_INTERVAL=30s` or
//! `PODLIGHT_LIGHT__DEVICE=...`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Environment, File, FileFormat};
use podlight_core::slot::{
    BookingTemplate, DEFAULT_BOOKING_DESCRIPTION, DEFAULT_BOOKING_LOCATION, DEFAULT_BOOKING_SUMMARY,
};
use podlight_core::{Color, Effect, EffectPolicy, Mode, PodlightResult};
use serde::{Deserialize, Deserializer};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);
const DEFAULT_COLLABORATOR_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_MAX_RESULTS: usize = 3;
const DEFAULT_TIMEZONE: &str = "Pacific/Auckland";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Time between two looks at the calendar
    #[serde(default = "default_poll_interval", deserialize_with = "humantime_duration")]
    pub poll_interval: Duration,

    /// Upper bound for a single provider or light call
    #[serde(
        default = "default_collaborator_timeout",
        deserialize_with = "humantime_duration"
    )]
    pub collaborator_timeout: Duration,

    /// How far ahead to ask the provider for events. Unbounded when unset,
    /// so a far-off next event still turns the light off.
    #[serde(default, deserialize_with = "humantime_duration_opt")]
    pub lookahead: Option<Duration>,

    /// How many upcoming events to consider each cycle
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    pub calendar: CalendarConfig,

    #[serde(default)]
    pub light: LightConfig,

    #[serde(default)]
    pub effects: EffectsConfig,

    #[serde(default)]
    pub booking: BookingConfig,
}

/// Which provider to ask, plus whatever keys that provider needs
/// (e.g. `google_account`, `google_calendar_id`).
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    pub provider: String,
    #[serde(flatten)]
    pub params: HashMap<String, serde_json::Value>,
}

impl CalendarConfig {
    /// Provider params as sent over the protocol.
    pub fn remote_config(&self) -> serde_json::Map<String, serde_json::Value> {
        self.params
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LightConfig {
    /// Light driver binary suffix (`podlight-light-{driver}`). Without one,
    /// effects are only logged.
    pub driver: Option<String>,
    /// Device address handed to the driver on connect
    pub device: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EffectsConfig {
    /// Effect shown once the next event is 10 minutes away or closer
    #[serde(default = "default_color")]
    pub default_color: String,
    #[serde(default)]
    pub default_mode: String,
    #[serde(default = "default_speed")]
    pub default_speed: u8,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        EffectsConfig {
            default_color: default_color(),
            default_mode: String::new(),
            default_speed: default_speed(),
        }
    }
}

impl EffectsConfig {
    pub fn policy(&self) -> PodlightResult<EffectPolicy> {
        let color = Color::parse(&self.default_color)?;
        let mode = if self.default_mode.is_empty() {
            Mode::default()
        } else {
            self.default_mode.parse()?
        };

        Ok(EffectPolicy::new(Effect::new(mode, color, self.default_speed)))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BookingConfig {
    pub summary: String,
    pub location: String,
    pub description: String,
    pub timezone: String,
}

impl Default for BookingConfig {
    fn default() -> Self {
        BookingConfig {
            summary: DEFAULT_BOOKING_SUMMARY.to_string(),
            location: DEFAULT_BOOKING_LOCATION.to_string(),
            description: DEFAULT_BOOKING_DESCRIPTION.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl BookingConfig {
    pub fn template(&self) -> PodlightResult<BookingTemplate> {
        Ok(BookingTemplate {
            summary: self.summary.clone(),
            location: self.location.clone(),
            description: self.description.clone(),
            timezone: BookingTemplate::parse_timezone(&self.timezone)?,
        })
    }
}

fn default_poll_interval() -> Duration {
    DEFAULT_POLL_INTERVAL
}

fn default_collaborator_timeout() -> Duration {
    DEFAULT_COLLABORATOR_TIMEOUT
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_color() -> String {
    Color::GREEN.to_string()
}

fn default_speed() -> u8 {
    Effect::default().speed
}

fn humantime_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}

fn humantime_duration_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    humantime_duration(deserializer).map(Some)
}

impl Config {
    /// Get the config file path (~/.config/podlight/config.toml)
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("podlight");
        Ok(config_dir.join("config.toml"))
    }

    /// Resolve `--config`, expanding `~`, or fall back to the default path.
    pub fn resolve_path(path: Option<&str>) -> Result<PathBuf> {
        match path {
            Some(p) => Ok(PathBuf::from(shellexpand::tilde(p).into_owned())),
            None => Self::default_path(),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Config file not found at {}\n\n\
                Run `podlight init` to create one, then set your calendar account.",
                path.display()
            );
        }

        let config: Config = config::Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .add_source(
                Environment::with_prefix("PODLIGHT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .and_then(|c| c.try_deserialize())
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    #[cfg(test)]
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = config::Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Catch configuration mistakes before anything starts running.
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than zero");
        }
        if self.collaborator_timeout.is_zero() {
            anyhow::bail!("collaborator_timeout must be greater than zero");
        }
        if self.max_results == 0 {
            anyhow::bail!("max_results must be at least 1");
        }
        if self.light.driver.is_some() && self.light.device.is_none() {
            anyhow::bail!("[light] has a driver but no device to connect to");
        }
        self.effects.policy().context("Invalid [effects] section")?;
        self.booking.template().context("Invalid [booking] section")?;
        Ok(())
    }

    /// Create a config file with the calendar section to fill in and every
    /// other option commented out.
    pub fn create_default(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Could not create config directory {}", parent.display()))?;
        }

        std::fs::write(path, DEFAULT_CONFIG)
            .with_context(|| format!("Could not write config file {}", path.display()))?;

        Ok(())
    }
}

const DEFAULT_CONFIG: &str = "\
# podlight configuration

# How often to look at the calendar:
# poll_interval = \"1m\"

# Give up on a provider or light call after:
# collaborator_timeout = \"10s\"

# How many upcoming events to consider, and optionally how far ahead to
# look for them (no limit by default):
# max_results = 3
# lookahead = \"30days\"

[calendar]
provider = \"google\"
google_account = \"you@example.com\"
# google_calendar_id = \"primary\"

[light]
# Without a driver, effects are only logged.
# driver = \"playbulb\"
# device = \"e1817cd1d2cd4c088a094b1c31223588\"

[effects]
# Shown when the next event is 10 minutes away or has started.
# Colors are 8 hex digits, RRGGBBAA, without a leading #:
# default_color = \"00FF00FF\"
# default_mode = \"solid\"
# default_speed = 10

[booking]
# summary = \"A Meeting\"
# location = \"This pod\"
# description = \"Booked using a Candle!\"
# timezone = \"Pacific/Auckland\"
";

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "\
[calendar]
provider = \"google\"
google_account = \"me@example.com\"
";

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_toml_str(MINIMAL).unwrap();

        assert_eq!(config.poll_interval, Duration::from_secs(60));
        assert_eq!(config.collaborator_timeout, Duration::from_secs(10));
        assert_eq!(config.max_results, 3);
        assert_eq!(config.lookahead, None);
        assert!(config.light.driver.is_none());
        assert_eq!(config.effects.policy().unwrap(), EffectPolicy::default());
        assert_eq!(config.booking.template().unwrap(), BookingTemplate::default());
    }

    #[test]
    fn calendar_params_are_forwarded() {
        let config = Config::from_toml_str(MINIMAL).unwrap();
        let remote = config.calendar.remote_config();

        assert_eq!(config.calendar.provider, "google");
        assert_eq!(remote["google_account"], "me@example.com");
        assert!(!remote.contains_key("provider"));
    }

    #[test]
    fn durations_are_human_readable() {
        let config = Config::from_toml_str(&format!(
            "poll_interval = \"30s\"\nlookahead = \"2days\"\n{MINIMAL}"
        ))
        .unwrap();

        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.lookahead, Some(Duration::from_secs(2 * 24 * 60 * 60)));
    }

    #[test]
    fn default_effect_is_configurable() {
        let config = Config::from_toml_str(&format!(
            "{MINIMAL}\n[effects]\ndefault_color = \"FF0000FF\"\ndefault_mode = \"pulse\"\ndefault_speed = 4\n"
        ))
        .unwrap();

        let policy = config.effects.policy().unwrap();
        assert_eq!(
            policy.default_effect,
            Effect::new(Mode::Pulse, Color::new(0xFF, 0, 0, 0xFF), 4)
        );
    }

    #[test]
    fn malformed_default_color_is_rejected() {
        for color in ["green", "#00FF00FF"] {
            let result = Config::from_toml_str(&format!(
                "{MINIMAL}\n[effects]\ndefault_color = \"{color}\"\n"
            ));
            assert!(result.is_err(), "{color:?} should be rejected");
        }
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let result =
            Config::from_toml_str(&format!("{MINIMAL}\n[booking]\ntimezone = \"Nowhere/Land\"\n"));
        assert!(result.is_err());
    }

    #[test]
    fn zero_max_results_is_rejected() {
        assert!(Config::from_toml_str(&format!("max_results = 0\n{MINIMAL}")).is_err());
    }

    #[test]
    fn driver_needs_a_device() {
        let result = Config::from_toml_str(&format!("{MINIMAL}\n[light]\ndriver = \"playbulb\"\n"));
        assert!(result.is_err());

        let config = Config::from_toml_str(&format!(
            "{MINIMAL}\n[light]\ndriver = \"playbulb\"\ndevice = \"aa:bb\"\n"
        ))
        .unwrap();
        assert_eq!(config.light.device.as_deref(), Some("aa:bb"));
    }

    #[test]
    fn missing_calendar_section_is_rejected() {
        assert!(Config::from_toml_str("poll_interval = \"1m\"\n").is_err());
    }

    #[test]
    fn default_file_parses() {
        let config = Config::from_toml_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.calendar.provider, "google");
    }
}
