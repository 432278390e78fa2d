use std::path::Path;

use anyhow::Result;

use crate::config::Config;

pub fn run(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("Config file already exists at {}", path.display());
    }

    Config::create_default(path)?;

    println!("Created {}", path.display());
    println!("\nSet your calendar account there, then run `podlight auth`.");

    Ok(())
}
