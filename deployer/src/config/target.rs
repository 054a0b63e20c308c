//! Appliance target and credentials

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::errors::DeployerError;

/// Where and how to reach the appliance
#[derive(Debug)]
pub struct Target {
    /// Base URL, without a trailing slash
    pub base_url: Url,

    /// Basic auth username
    pub username: String,

    /// Basic auth password
    pub password: SecretString,

    /// Accept self-signed certificates
    pub insecure_skip_tls_verify: bool,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Target {
    /// Build a target from a host (`1.2.3.4`) or a full URL (`https://opsman.example`)
    pub fn new(
        target: &str,
        username: &str,
        password: SecretString,
        insecure_skip_tls_verify: bool,
        request_timeout: Duration,
    ) -> Result<Self, DeployerError> {
        let target = target.trim();
        let raw = if target.contains("://") {
            target.to_string()
        } else {
            format!("https://{}", target)
        };

        let base_url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| DeployerError::ConfigError(format!("Invalid target '{}': {}", target, e)))?;
        if base_url.host_str().is_none() {
            return Err(DeployerError::ConfigError(format!("Target '{}' has no host", target)));
        }

        Ok(Self {
            base_url,
            username: username.to_string(),
            password,
            insecure_skip_tls_verify,
            request_timeout,
        })
    }

    /// Base URL as a string without a trailing slash
    pub fn base(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }
}
