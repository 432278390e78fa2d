use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;

use crate::calendar::ProviderCalendar;
use crate::config::Config;
use crate::light::{DriverLight, Light, LogLight};
use crate::poll::Poller;

use super::provider_calendar;

pub async fn run(config: &Config, dry_run: bool) -> Result<()> {
    let calendar = provider_calendar(config)?;

    let cancel = CancellationToken::new();
    tokio::spawn(cancel_on_shutdown(cancel.clone()));

    match (&config.light.driver, dry_run) {
        (Some(driver), false) => {
            let device = config.light.device.as_deref().unwrap_or_default();
            let light = DriverLight::new(driver, device, config.collaborator_timeout)?;
            poll(config, calendar, light, cancel).await
        }
        _ => {
            if !dry_run {
                tracing::info!("no light driver configured, effects are only logged");
            }
            poll(config, calendar, LogLight::new(config.light.device.clone()), cancel).await
        }
    }
}

async fn poll<L: Light>(
    config: &Config,
    calendar: ProviderCalendar,
    light: L,
    cancel: CancellationToken,
) -> Result<()> {
    let mut poller = Poller::new(
        calendar,
        light,
        config.effects.policy()?,
        config.poll_interval,
        config.collaborator_timeout,
    );

    tracing::info!(
        provider = %config.calendar.provider,
        interval = %humantime::format_duration(config.poll_interval),
        "watching calendar"
    );

    poller.run(cancel).await.context("Polling stopped")?;

    tracing::info!("stopped");
    Ok(())
}

/// Cancel on Ctrl-C, or SIGTERM on unix.
async fn cancel_on_shutdown(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    tracing::info!("shutting down");
    cancel.cancel();
}
