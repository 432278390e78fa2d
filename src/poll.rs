//! The polling loop: look at the calendar, pick an effect, show it, wait.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use podlight_core::{Decision, EffectPolicy, PodlightError, PodlightResult};
use tokio::time::{MissedTickBehavior, timeout};
use tokio_util::sync::CancellationToken;

use crate::calendar::CalendarSource;
use crate::light::Light;

pub struct Poller<C, L> {
    calendar: C,
    light: L,
    policy: EffectPolicy,
    interval: Duration,
    timeout: Duration,
}

impl<C: CalendarSource, L: Light> Poller<C, L> {
    pub fn new(
        calendar: C,
        light: L,
        policy: EffectPolicy,
        interval: Duration,
        timeout: Duration,
    ) -> Self {
        Poller {
            calendar,
            light,
            policy,
            interval,
            timeout,
        }
    }

    /// Poll until `cancel` fires or a fatal error occurs. The light is
    /// disconnected on the way out either way.
    pub async fn run(&mut self, cancel: CancellationToken) -> PodlightResult<()> {
        let result = self.poll(&cancel).await;

        match timeout(self.timeout, self.light.disconnect()).await {
            Ok(Ok(())) => tracing::debug!("light disconnected"),
            Ok(Err(e)) => tracing::warn!(error = %e, "failed to disconnect light"),
            Err(_) => tracing::warn!("light did not disconnect in time"),
        }

        result
    }

    async fn poll(&mut self, cancel: &CancellationToken) -> PodlightResult<()> {
        match bounded(self.timeout, cancel, self.light.connect(), light_timeout).await {
            None => return Ok(()),
            Some(Ok(())) => tracing::info!("light connected"),
            Some(Err(e)) if e.is_collaborator_unavailable() => {
                tracing::warn!(error = %e, "light unavailable, will retry on the next effect")
            }
            Some(Err(e)) => return Err(e),
        }

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            if cancel.is_cancelled() {
                return Ok(());
            }

            match self.run_cycle(cancel).await {
                Ok(Some(_)) => {}
                Ok(None) => return Ok(()),
                Err(e) if e.is_collaborator_unavailable() => {
                    tracing::warn!(error = %e, "skipping this cycle")
                }
                Err(e) => return Err(e),
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(()),
                _ = ticker.tick() => {}
            }
        }
    }

    /// One look at the calendar. Returns `None` if cancelled midway.
    pub async fn run_cycle(
        &mut self,
        cancel: &CancellationToken,
    ) -> PodlightResult<Option<Decision>> {
        let now = Utc::now();

        let events = match bounded(
            self.timeout,
            cancel,
            self.calendar.list_upcoming(now),
            calendar_timeout,
        )
        .await
        {
            Some(events) => events?,
            None => return Ok(None),
        };

        let decision = Decision::compute(events, now, &self.policy);

        for event in &decision.future_events {
            tracing::info!(summary = %event.summary, start = %event.start, "upcoming event");
        }

        match decision.effect {
            Some(effect) => {
                match bounded(
                    self.timeout,
                    cancel,
                    self.light.apply_effect(&effect),
                    light_timeout,
                )
                .await
                {
                    Some(result) => result?,
                    None => return Ok(None),
                }
                tracing::info!(%effect, "light set");
            }
            None => tracing::info!("No upcoming events"),
        }

        Ok(Some(decision))
    }
}

/// Wait for a collaborator call for at most `limit`. `None` means the
/// token was cancelled first.
async fn bounded<T>(
    limit: Duration,
    cancel: &CancellationToken,
    call: impl Future<Output = PodlightResult<T>>,
    on_timeout: fn(Duration) -> PodlightError,
) -> Option<PodlightResult<T>> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        result = timeout(limit, call) => Some(result.unwrap_or_else(|_| Err(on_timeout(limit)))),
    }
}

fn calendar_timeout(limit: Duration) -> PodlightError {
    PodlightError::ProviderTimeout(limit.as_secs())
}

fn light_timeout(limit: Duration) -> PodlightError {
    PodlightError::Driver(format!("Light did not answer within {}s", limit.as_secs()))
}
