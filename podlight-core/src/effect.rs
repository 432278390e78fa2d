//! Light effects and the decision of which one to show.
//!
//! The effect is chosen purely from the time left until the next event,
//! split into four bands:
//!
//! | time until start | effect                         |
//! |------------------|--------------------------------|
//! | more than 2h     | solid, off (`00000000`)        |
//! | more than 20m    | solid blue (`0000FFFF`)        |
//! | more than 10m    | solid dim blue (`000000FF`)    |
//! | anything else    | the configured default effect  |

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::PodlightError;
use crate::event::Event;

/// Animation modes supported by the light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Solid,
    Flash,
    Pulse,
    RainbowJump,
    RainbowFade,
    Candle,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Solid => "SOLID",
            Mode::Flash => "FLASH",
            Mode::Pulse => "PULSE",
            Mode::RainbowJump => "RAINBOW_JUMP",
            Mode::RainbowFade => "RAINBOW_FADE",
            Mode::Candle => "CANDLE",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = PodlightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "solid" => Ok(Mode::Solid),
            "flash" => Ok(Mode::Flash),
            "pulse" => Ok(Mode::Pulse),
            "rainbow_jump" => Ok(Mode::RainbowJump),
            "rainbow_fade" => Ok(Mode::RainbowFade),
            "candle" => Ok(Mode::Candle),
            _ => Err(PodlightError::InvalidMode(s.to_string())),
        }
    }
}

/// What the light should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Effect {
    pub mode: Mode,
    pub color: Color,
    /// Device-specific animation speed, 0 is static.
    pub speed: u8,
}

impl Effect {
    pub const fn new(mode: Mode, color: Color, speed: u8) -> Self {
        Effect { mode, color, speed }
    }

    pub const fn solid(color: Color) -> Self {
        Effect::new(Mode::Solid, color, 0)
    }
}

impl Default for Effect {
    /// Solid green at speed 10: the space is in use or about to be.
    fn default() -> Self {
        Effect::new(Mode::Solid, Color::GREEN, 10)
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{} speed={}", self.mode, self.color, self.speed)
    }
}

/// Maps the time until the next event onto an [`Effect`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectPolicy {
    /// Shown when the next event is 10 minutes away or closer, including
    /// once it has started.
    pub default_effect: Effect,
}

impl EffectPolicy {
    pub fn new(default_effect: Effect) -> Self {
        EffectPolicy { default_effect }
    }

    /// Choose the effect for `reference`, the soonest future event.
    ///
    /// `_can_book_next_slot` is accepted but does not influence the bands.
    /// An event without a precise start is treated as already started.
    pub fn effect_from_event(
        &self,
        reference: &Event,
        now: DateTime<Utc>,
        _can_book_next_slot: bool,
    ) -> Effect {
        let delta = reference
            .start
            .instant()
            .map(|start| start - now)
            .unwrap_or_else(Duration::zero);

        tracing::debug!(%delta, event = %reference.summary, "time until next event");

        self.effect_for_delta(delta)
    }

    /// The band lookup on its own. Boundaries are exclusive: exactly 2 hours
    /// away is "approaching", exactly 10 minutes away is the default.
    pub fn effect_for_delta(&self, delta: Duration) -> Effect {
        if delta > Duration::hours(2) {
            Effect::solid(Color::OFF)
        } else if delta > Duration::minutes(20) {
            Effect::solid(Color::BLUE)
        } else if delta > Duration::minutes(10) {
            Effect::solid(Color::DIM_BLUE)
        } else {
            self.default_effect
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventStatus, EventTime};
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap()
    }

    fn event_in(delta: Duration) -> Event {
        let start = now() + delta;
        Event {
            id: String::new(),
            summary: "Design review".to_string(),
            location: None,
            description: None,
            start: start.into(),
            end: (start + Duration::minutes(30)).into(),
            status: EventStatus::Confirmed,
        }
    }

    #[test]
    fn far_away_turns_light_off() {
        let policy = EffectPolicy::default();
        let effect = policy.effect_from_event(&event_in(Duration::hours(3)), now(), true);
        assert_eq!(effect, Effect::new(Mode::Solid, Color::OFF, 0));
    }

    #[test]
    fn approaching_is_blue() {
        let policy = EffectPolicy::default();
        let effect = policy.effect_from_event(&event_in(Duration::minutes(45)), now(), true);
        assert_eq!(effect, Effect::solid(Color::BLUE));
    }

    #[test]
    fn imminent_is_dim_blue() {
        let policy = EffectPolicy::default();
        let effect = policy.effect_from_event(&event_in(Duration::minutes(15)), now(), true);
        assert_eq!(effect, Effect::solid(Color::DIM_BLUE));
    }

    #[test]
    fn close_or_started_uses_default() {
        let policy = EffectPolicy::default();
        for delta in [Duration::minutes(5), Duration::zero(), Duration::minutes(-10)] {
            let effect = policy.effect_from_event(&event_in(delta), now(), true);
            assert_eq!(effect, Effect::new(Mode::Solid, Color::GREEN, 10));
        }
    }

    #[test]
    fn band_boundaries_are_exclusive() {
        let policy = EffectPolicy::default();
        assert_eq!(policy.effect_for_delta(Duration::hours(2)), Effect::solid(Color::BLUE));
        assert_eq!(
            policy.effect_for_delta(Duration::hours(2) + Duration::seconds(1)),
            Effect::solid(Color::OFF)
        );
        assert_eq!(policy.effect_for_delta(Duration::minutes(20)), Effect::solid(Color::DIM_BLUE));
        assert_eq!(policy.effect_for_delta(Duration::minutes(10)), Effect::default());
    }

    #[test]
    fn bookability_does_not_change_the_effect() {
        let policy = EffectPolicy::default();
        for delta in [Duration::hours(5), Duration::minutes(30), Duration::minutes(12), Duration::minutes(1)] {
            let event = event_in(delta);
            assert_eq!(
                policy.effect_from_event(&event, now(), true),
                policy.effect_from_event(&event, now(), false)
            );
        }
    }

    #[test]
    fn configured_default_replaces_green() {
        let policy = EffectPolicy::new(Effect::new(Mode::Pulse, Color::new(0xFF, 0, 0, 0xFF), 3));
        let effect = policy.effect_from_event(&event_in(Duration::minutes(2)), now(), false);
        assert_eq!(effect.mode, Mode::Pulse);
        assert_eq!(effect.color.to_string(), "FF0000FF");
        // Other bands stay fixed.
        assert_eq!(policy.effect_for_delta(Duration::hours(3)), Effect::solid(Color::OFF));
    }

    #[test]
    fn all_day_reference_falls_back_to_default() {
        let mut event = event_in(Duration::hours(5));
        event.start = EventTime::parse("2025-06-03");
        let effect = EffectPolicy::default().effect_from_event(&event, now(), true);
        assert_eq!(effect, Effect::default());
    }

    #[test]
    fn mode_parses_case_insensitively() {
        assert_eq!("SOLID".parse::<Mode>().unwrap(), Mode::Solid);
        assert_eq!("rainbow-fade".parse::<Mode>().unwrap(), Mode::RainbowFade);
        assert!("strobe".parse::<Mode>().is_err());
    }

    #[test]
    fn effect_display() {
        assert_eq!(Effect::default().to_string(), "SOLID #00FF00FF speed=10");
    }
}
