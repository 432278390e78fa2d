//! Provider subprocess protocol.
//!
//! This module handles communication with external provider binaries
//! (e.g., `podlight-provider-google`) using JSON over stdin/stdout.
//!
//! Providers manage their own credentials and tokens. Core just passes
//! provider-specific parameters from the calendar config.

use std::time::Duration;

use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command as TokioCommand;
use tokio::time::timeout;

use crate::error::{PodlightError, PodlightResult};
use crate::protocol::{Authenticate, Command, ProviderCommand, Request, Response};

pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);
/// Sign-in involves the user, so it gets far longer than regular calls.
const AUTH_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Clone, Debug)]
pub struct Provider {
    name: String,
    timeout: Duration,
}

impl Provider {
    pub fn from_name(name: &str) -> Self {
        Provider {
            name: name.to_string(),
            timeout: DEFAULT_PROVIDER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn binary_name(&self) -> String {
        format!("podlight-provider-{}", self.name)
    }

    fn binary_path(&self) -> PodlightResult<std::path::PathBuf> {
        let binary_name = self.binary_name();
        which::which(&binary_name).map_err(|_| PodlightError::ProviderNotInstalled(binary_name))
    }

    /// Fail early if the provider binary is missing.
    pub fn ensure_installed(&self) -> PodlightResult<()> {
        self.binary_path().map(|_| ())
    }

    /// Run the provider's sign-in flow. Returns the account identifier.
    pub async fn authenticate(&self) -> PodlightResult<String> {
        self.call_with_timeout(Authenticate {}, AUTH_TIMEOUT).await
    }

    /// Call a typed provider command and return the result.
    ///
    /// The response type is inferred from the command's associated type.
    pub async fn call<C: ProviderCommand>(&self, cmd: C) -> PodlightResult<C::Response> {
        self.call_with_timeout(cmd, self.timeout).await
    }

    async fn call_with_timeout<C: ProviderCommand>(
        &self,
        cmd: C,
        limit: Duration,
    ) -> PodlightResult<C::Response> {
        timeout(limit, self.call_raw(C::command(), cmd))
            .await
            .map_err(|_| PodlightError::ProviderTimeout(limit.as_secs()))?
    }

    /// Low-level call that sends a command with params and deserializes the response.
    async fn call_raw<P: Serialize, R: serde::de::DeserializeOwned>(
        &self,
        command: Command,
        params: P,
    ) -> PodlightResult<R> {
        let params = serde_json::to_value(params)
            .map_err(|e| PodlightError::Serialization(e.to_string()))?;
        let request = Request { command, params };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| PodlightError::Serialization(e.to_string()))?;

        let binary_path = self.binary_path()?;

        tracing::debug!(provider = %self.name, ?command, "calling provider");

        let mut child = TokioCommand::new(&binary_path)
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                PodlightError::Provider(format!("Failed to spawn {}: {}", binary_path.display(), e))
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| PodlightError::Provider("Provider stdin unavailable".into()))?;
        stdin
            .write_all(format!("{request_json}\n").as_bytes())
            .await?;
        drop(stdin);

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(PodlightError::Provider(format!(
                "Provider exited with status: {}",
                output.status.code().unwrap_or(-1)
            )));
        }

        let response_str = String::from_utf8_lossy(&output.stdout);
        if response_str.trim().is_empty() {
            return Err(PodlightError::Provider(
                "Provider returned no response".into(),
            ));
        }

        parse_response(&response_str)
    }
}

fn parse_response<R: serde::de::DeserializeOwned>(line: &str) -> PodlightResult<R> {
    let response: Response<R> = serde_json::from_str(line.trim())
        .map_err(|e| PodlightError::Provider(format!("Failed to parse response: {}", e)))?;

    match response {
        Response::Success { data } => Ok(data),
        Response::Error { error } => Err(PodlightError::Provider(error)),
    }
}
