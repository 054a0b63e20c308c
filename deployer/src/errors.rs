//! Error types for the deployer

use std::time::Duration;

use thiserror::Error;

/// Main error type for the deployer
#[derive(Error, Debug)]
pub enum DeployerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    YamlError(#[from] serde_norway::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid version '{version}': {reason}")]
    VersionFormat { version: String, reason: String },

    /// Timeouts, unreachable hosts and 5xx responses
    #[error("Appliance unavailable: {0}")]
    Transient(String),

    #[error("Appliance returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Installation settings rejected: {0}")]
    Settings(String),

    #[error("Upgrade rejected: {0}")]
    Upgrade(String),

    #[error("Installation {id} failed: {reason}")]
    Installation { id: u64, reason: String },

    #[error("Gave up waiting for installation {id} after {waited:?}, outcome unknown")]
    PollTimeout { id: u64, waited: Duration },

    #[error("Installed version {current} is newer than desired version {desired}")]
    DowngradeRefused { current: String, desired: String },

    #[error("Settings merge failed: {0}")]
    Merge(String),
}

impl DeployerError {
    /// Whether retrying a read-only call could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            DeployerError::Transient(_) => true,
            DeployerError::HttpError(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}
