//! Error types for the podlight ecosystem.

use thiserror::Error;

/// Errors that can occur in podlight operations.
#[derive(Error, Debug)]
pub enum PodlightError {
    #[error("Invalid color '{0}': expected 8 hex digits (RRGGBBAA)")]
    InvalidColorFormat(String),

    #[error("Invalid light mode: {0}")]
    InvalidMode(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Provider '{0}' not found in PATH")]
    ProviderNotInstalled(String),

    #[error("Provider request timed out after {0}s")]
    ProviderTimeout(u64),

    #[error("Light driver error: {0}")]
    Driver(String),

    #[error("Light driver '{0}' not found in PATH")]
    DriverNotInstalled(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PodlightError {
    /// Whether the error comes from a calendar or light collaborator that may
    /// recover on its own. The polling loop skips the cycle for these and
    /// retries on the next tick; anything else is a configuration problem.
    pub fn is_collaborator_unavailable(&self) -> bool {
        matches!(
            self,
            PodlightError::Provider(_)
                | PodlightError::ProviderTimeout(_)
                | PodlightError::Driver(_)
                | PodlightError::Io(_)
        )
    }
}

/// Result type alias for podlight operations.
pub type PodlightResult<T> = Result<T, PodlightError>;
