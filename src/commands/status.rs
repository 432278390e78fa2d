use anyhow::Result;
use chrono::Utc;

use crate::config::Config;
use crate::render::Render;

use super::{decide, provider_calendar};

pub async fn run(config: &Config) -> Result<()> {
    let calendar = provider_calendar(config)?;
    let policy = config.effects.policy()?;

    let decision = decide(&calendar, &policy, Utc::now()).await?;
    println!("{}", decision.render());

    Ok(())
}
