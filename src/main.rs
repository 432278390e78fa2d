mod calendar;
mod commands;
mod config;
mod light;
mod poll;
mod render;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;

#[derive(Parser)]
#[command(name = "podlight")]
#[command(about = "Show whether a shared space is free, based on its calendar")]
struct Cli {
    /// Config file (defaults to ~/.config/podlight/config.toml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch the calendar and keep the light up to date
    Run {
        /// Log effects instead of sending them to the light
        #[arg(long)]
        dry_run: bool,
    },
    /// Show upcoming events and the effect the light would get
    Status,
    /// Book the space for the next 30 minutes
    Book {
        /// Book even if the slot is not free
        #[arg(long)]
        force: bool,
    },
    /// Sign in with the calendar provider
    Auth {
        /// Provider to authenticate with (defaults to the configured one)
        provider: Option<String>,
    },
    /// Create a default config file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json);

    let config_path = Config::resolve_path(cli.config.as_deref())?;

    match cli.command {
        Commands::Init => commands::init::run(&config_path),
        Commands::Auth { provider } => {
            let provider = match provider {
                Some(provider) => provider,
                None => Config::load(&config_path)?.calendar.provider,
            };
            commands::auth::run(&provider).await
        }
        Commands::Run { dry_run } => commands::run::run(&Config::load(&config_path)?, dry_run).await,
        Commands::Status => commands::status::run(&Config::load(&config_path)?).await,
        Commands::Book { force } => commands::book::run(&Config::load(&config_path)?, force).await,
    }
}

fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("podlight=info"));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
