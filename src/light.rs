//! Light clients.
//!
//! A real light is driven through a `podlight-light-{driver}` binary that
//! stays alive for the whole run and answers one JSON line per request.
//! Without a driver, effects are only logged.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use podlight_core::protocol::{DriverRequest, Response};
use podlight_core::{Effect, PodlightError, PodlightResult};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tokio::time::timeout;

#[async_trait]
pub trait Light: Send {
    async fn connect(&mut self) -> PodlightResult<()>;
    async fn apply_effect(&mut self, effect: &Effect) -> PodlightResult<()>;
    async fn disconnect(&mut self) -> PodlightResult<()>;
}

/// Dry-run light: writes every effect to the log.
#[derive(Debug, Default)]
pub struct LogLight {
    device: Option<String>,
}

impl LogLight {
    pub fn new(device: Option<String>) -> Self {
        LogLight { device }
    }
}

#[async_trait]
impl Light for LogLight {
    async fn connect(&mut self) -> PodlightResult<()> {
        tracing::info!(device = ?self.device, "dry run: not connecting to a light");
        Ok(())
    }

    async fn apply_effect(&mut self, effect: &Effect) -> PodlightResult<()> {
        tracing::info!(%effect, "dry run: would set light");
        Ok(())
    }

    async fn disconnect(&mut self) -> PodlightResult<()> {
        Ok(())
    }
}

pub struct DriverLight {
    binary: PathBuf,
    args: Vec<String>,
    device: String,
    timeout: Duration,
    process: Option<DriverProcess>,
}

impl DriverLight {
    /// Find `podlight-light-{driver}` in PATH.
    pub fn new(driver: &str, device: &str, timeout: Duration) -> PodlightResult<Self> {
        let binary_name = format!("podlight-light-{driver}");
        let binary =
            which::which(&binary_name).map_err(|_| PodlightError::DriverNotInstalled(binary_name))?;
        Ok(Self::with_command(binary, Vec::new(), device, timeout))
    }

    fn with_command(binary: PathBuf, args: Vec<String>, device: &str, timeout: Duration) -> Self {
        DriverLight {
            binary,
            args,
            device: device.to_string(),
            timeout,
            process: None,
        }
    }

    /// A request whose caller was cancelled before the reply arrived leaves
    /// that reply unread in the pipe. Such a driver is out of step with us,
    /// so drop (and kill) it rather than talk to it again.
    fn discard_interrupted(&mut self) {
        if self.process.as_ref().is_some_and(|process| process.in_flight) {
            tracing::warn!(
                device = %self.device,
                "light driver was interrupted mid-request, restarting it"
            );
            self.process = None;
        }
    }

    /// Send one request. A driver that stops answering is dropped (and
    /// killed) so the next call starts a fresh one.
    async fn request(&mut self, request: DriverRequest) -> PodlightResult<()> {
        let process = self
            .process
            .as_mut()
            .ok_or_else(|| PodlightError::Driver("Light is not connected".into()))?;

        let outcome = match timeout(self.timeout, process.send(&request)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(PodlightError::Driver(format!(
                "Light driver did not answer within {}s",
                self.timeout.as_secs()
            ))),
        };

        match outcome {
            Ok(reply) => reply.map_err(PodlightError::Driver),
            Err(e) => {
                self.process = None;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl Light for DriverLight {
    async fn connect(&mut self) -> PodlightResult<()> {
        self.discard_interrupted();
        if self.process.is_none() {
            self.process = Some(DriverProcess::spawn(&self.binary, &self.args)?);
        }

        tracing::debug!(device = %self.device, "connecting to light");
        self.request(DriverRequest::Connect {
            device: self.device.clone(),
        })
        .await
    }

    async fn apply_effect(&mut self, effect: &Effect) -> PodlightResult<()> {
        self.discard_interrupted();
        if self.process.is_none() {
            self.connect().await?;
        }

        self.request(DriverRequest::ApplyEffect { effect: *effect })
            .await
    }

    async fn disconnect(&mut self) -> PodlightResult<()> {
        self.discard_interrupted();
        if self.process.is_none() {
            return Ok(());
        }

        let result = self.request(DriverRequest::Disconnect).await;

        if let Some(process) = self.process.take() {
            process.shutdown(self.timeout).await;
        }

        result
    }
}

struct DriverProcess {
    child: Child,
    stdin: ChildStdin,
    stdout: Lines<BufReader<ChildStdout>>,
    /// Set from writing a request until its reply has been read.
    in_flight: bool,
}

impl DriverProcess {
    fn spawn(binary: &Path, args: &[String]) -> PodlightResult<Self> {
        let mut child = Command::new(binary)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                PodlightError::Driver(format!("Failed to spawn {}: {}", binary.display(), e))
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| PodlightError::Driver("Driver stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| PodlightError::Driver("Driver stdout unavailable".into()))?;

        Ok(DriverProcess {
            child,
            stdin,
            stdout: BufReader::new(stdout).lines(),
            in_flight: false,
        })
    }

    /// The outer error means the driver itself is broken; the inner one is
    /// an error the driver reported.
    async fn send(&mut self, request: &DriverRequest) -> PodlightResult<Result<(), String>> {
        let line = serde_json::to_string(request)
            .map_err(|e| PodlightError::Serialization(e.to_string()))?;

        self.in_flight = true;
        self.stdin.write_all(format!("{line}\n").as_bytes()).await?;
        self.stdin.flush().await?;

        let reply = self
            .stdout
            .next_line()
            .await?
            .ok_or_else(|| PodlightError::Driver("Light driver exited".into()))?;
        self.in_flight = false;

        let response: Response<serde_json::Value> = serde_json::from_str(reply.trim())
            .map_err(|e| PodlightError::Driver(format!("Failed to parse driver response: {}", e)))?;

        Ok(match response {
            Response::Success { .. } => Ok(()),
            Response::Error { error } => Err(error),
        })
    }

    /// Close stdin and give the driver a moment to exit before killing it.
    async fn shutdown(mut self, grace: Duration) {
        drop(self.stdin);

        match timeout(grace, self.child.wait()).await {
            Ok(Ok(status)) => tracing::debug!(%status, "light driver exited"),
            Ok(Err(e)) => tracing::warn!(error = %e, "failed to reap light driver"),
            Err(_) => {
                tracing::warn!("light driver did not exit, killing it");
                if let Err(e) = self.child.kill().await {
                    tracing::warn!(error = %e, "failed to kill light driver");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podlight_core::Color;

    #[test]
    fn missing_driver_is_reported_as_not_installed() {
        let result = DriverLight::new(
            "definitely-not-installed-anywhere",
            "aa:bb",
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(PodlightError::DriverNotInstalled(_))));
    }

    #[tokio::test]
    async fn log_light_accepts_everything() {
        let mut light = LogLight::new(None);
        light.connect().await.unwrap();
        light.apply_effect(&Effect::solid(Color::BLUE)).await.unwrap();
        light.disconnect().await.unwrap();
    }

    /// A driver played by a shell loop.
    fn fake_driver(script: &str) -> DriverLight {
        DriverLight::with_command(
            PathBuf::from("sh"),
            vec!["-c".to_string(), script.to_string()],
            "aa:bb",
            Duration::from_secs(5),
        )
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn driver_round_trip() {
        let mut light = fake_driver(
            r#"while read line; do echo '{"status":"success","data":null}'; done"#,
        );

        light.connect().await.unwrap();
        light.apply_effect(&Effect::solid(Color::BLUE)).await.unwrap();
        light.disconnect().await.unwrap();
        assert!(light.process.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn driver_errors_are_driver_failures() {
        let mut light = fake_driver(
            r#"while read line; do echo '{"status":"error","error":"out of range"}'; done"#,
        );

        match light.connect().await {
            Err(PodlightError::Driver(msg)) => assert_eq!(msg, "out of range"),
            other => panic!("expected driver error, got {other:?}"),
        }
        // The driver is still running, it just refused.
        assert!(light.process.is_some());

        light.disconnect().await.ok();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn interrupted_request_does_not_leak_its_reply() {
        let marker = std::env::temp_dir().join(format!("podlight-slow-driver-{}", std::process::id()));
        let _ = std::fs::remove_file(&marker);

        // The first effect is answered late, and only by the first driver.
        let script = r#"n=0
while read line; do
  n=$((n+1))
  if [ "$n" -eq 2 ] && [ ! -e "MARKER" ]; then
    touch "MARKER"
    sleep 1
    echo '{"status":"error","error":"reply to first effect"}'
  else
    echo '{"status":"success","data":null}'
  fi
done"#
            .replace("MARKER", &marker.display().to_string());
        let mut light = fake_driver(&script);

        light.connect().await.unwrap();

        let cut_short = tokio::time::timeout(
            Duration::from_millis(200),
            light.apply_effect(&Effect::solid(Color::BLUE)),
        )
        .await;
        assert!(cut_short.is_err());
        assert!(light.process.as_ref().is_some_and(|process| process.in_flight));

        light.apply_effect(&Effect::solid(Color::OFF)).await.unwrap();
        assert!(light.process.as_ref().is_some_and(|process| !process.in_flight));

        light.disconnect().await.unwrap();
        let _ = std::fs::remove_file(&marker);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dead_driver_is_restarted_on_next_effect() {
        let mut light = fake_driver("exit 0");

        assert!(light.connect().await.is_err());
        assert!(light.process.is_none());
        assert!(light.apply_effect(&Effect::default()).await.is_err());
    }
}
