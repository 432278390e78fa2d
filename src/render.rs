//! Colored terminal rendering for podlight-core types.

use owo_colors::OwoColorize;
use podlight_core::{Color, Decision, Effect, Event};

pub trait Render {
    fn render(&self) -> String;
}

impl Render for Color {
    fn render(&self) -> String {
        // A swatch in the color itself, then the hex code
        format!(
            "{} {}",
            "■".truecolor(self.r, self.g, self.b),
            self.to_string().dimmed()
        )
    }
}

impl Render for Effect {
    fn render(&self) -> String {
        format!(
            "{} {} {}",
            self.mode.as_str().bold(),
            self.color.render(),
            format!("speed {}", self.speed).dimmed()
        )
    }
}

impl Render for Event {
    fn render(&self) -> String {
        format!("{} {}", self.summary, self.start.to_string().dimmed())
    }
}

impl Render for Decision {
    fn render(&self) -> String {
        let mut lines = Vec::new();

        match &self.current_event {
            Some(event) => lines.push(format!("{} {}", "Now:".bold(), event.render().red())),
            None => lines.push(format!("{} {}", "Now:".bold(), "free".green())),
        }

        if !self.has_upcoming_events() {
            lines.push("No upcoming events".dimmed().to_string());
        } else {
            lines.push("Upcoming:".bold().to_string());
            for event in &self.future_events {
                lines.push(format!("   {}", event.render()));
            }
        }

        let bookable = if self.can_book_next_slot {
            "yes".green().to_string()
        } else {
            "no".yellow().to_string()
        };
        lines.push(format!("{} {}", "Next 30 minutes bookable:".bold(), bookable));

        match &self.effect {
            Some(effect) => lines.push(format!("{} {}", "Light:".bold(), effect.render())),
            None => lines.push(format!("{} {}", "Light:".bold(), "unchanged".dimmed())),
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use podlight_core::{EffectPolicy, EventStatus, EventTime};

    #[test]
    fn empty_decision_mentions_no_events() {
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let decision = Decision::compute(Vec::new(), now, &EffectPolicy::default());

        let text = decision.render();

        assert!(text.contains("free"));
        assert!(text.contains("No upcoming events"));
        assert!(text.contains("unchanged"));
    }

    #[test]
    fn upcoming_events_are_listed() {
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 9, 0, 0).unwrap();
        let event = Event {
            id: "standup".into(),
            summary: "Standup".into(),
            location: None,
            description: None,
            start: EventTime::from(now + chrono::Duration::minutes(45)),
            end: EventTime::from(now + chrono::Duration::minutes(60)),
            status: EventStatus::Confirmed,
        };
        let decision = Decision::compute(vec![event], now, &EffectPolicy::default());

        let text = decision.render();

        assert!(text.contains("Upcoming:"));
        assert!(text.contains("Standup"));
        assert!(!text.contains("No upcoming events"));
    }

    #[test]
    fn effect_shows_mode_and_color() {
        let text = Effect::default().render();
        assert!(text.contains("SOLID"));
        assert!(text.contains("00FF00FF"));
        assert!(text.contains("speed 10"));
    }
}
