use anyhow::Result;
use podlight_core::provider::Provider;

pub async fn run(provider_name: &str) -> Result<()> {
    let provider = Provider::from_name(provider_name);
    provider.ensure_installed()?;

    println!("Authenticating with {}...", provider.name());

    // Provider handles the full OAuth flow and stores its own tokens
    let account = provider.authenticate().await?;

    println!("\nAuthenticated as: {}", account);
    println!("\nMake sure your config.toml has:");
    println!();
    println!("[calendar]");
    println!("provider = \"{}\"", provider.name());
    println!("{}_account = \"{}\"", provider.name(), account);
    println!();
    println!("Then run `podlight status` to check what the light would show.");

    Ok(())
}
