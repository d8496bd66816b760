//! Error types for the installer

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Insufficient privileges - run as Administrator")]
    InsufficientPrivileges,

    #[error("Unsupported platform - the Docker service can only be installed on Windows")]
    UnsupportedPlatform,

    #[error("Invalid artifact source: {0}")]
    InvalidSource(String),

    #[error("Transfer from {url} failed: {error}")]
    Transfer {
        url: String,
        #[source]
        error: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Service registration failed: {0}")]
    ServiceRegistration(String),

    #[error("Docker daemon not ready after {}s ({attempts} attempts)", .waited.as_secs())]
    ReadinessTimeout { waited: Duration, attempts: u32 },

    #[error("Failed to launch {program}: {error}")]
    Spawn {
        program: String,
        #[source]
        error: std::io::Error,
    },

    #[error("Command failed: {0}")]
    Command(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    Windows(#[from] windows::core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this is a privilege error
    pub fn is_privilege_error(&self) -> bool {
        matches!(self, Error::InsufficientPrivileges | Error::UnsupportedPlatform)
    }

    /// True when a program could not be launched because it does not exist
    pub fn is_missing_program(&self) -> bool {
        matches!(self, Error::Spawn { error, .. } if error.kind() == std::io::ErrorKind::NotFound)
    }

    pub(crate) fn transfer(
        url: impl Into<String>,
        error: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Transfer {
            url: url.into(),
            error: error.into(),
        }
    }
}
