//! Deployment file management

use std::path::{Path, PathBuf};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::config::target::Target;
use crate::deploy::poller;
use crate::errors::DeployerError;
use crate::filesys::file::File;
use crate::logs::LogLevel;
use crate::version::Version;

/// Deployment file contents
#[derive(Debug, Deserialize)]
pub struct DeploymentConfig {
    /// Product name, as the appliance identifies it
    pub name: String,

    /// Version to deploy or upgrade to
    pub desired_version: String,

    /// Path to the product artifact
    pub filepath: PathBuf,

    /// Path to the desired installation settings template
    pub installation_settings_file: PathBuf,

    /// Optional stemcell imported before installing
    #[serde(default)]
    pub stemcell: Option<PathBuf>,

    /// Appliance host or URL
    pub target: String,

    /// Appliance username
    pub username: String,

    /// Appliance password
    pub password: SecretString,

    /// Skip TLS certificate verification
    #[serde(default = "default_true")]
    pub insecure_skip_tls_verify: bool,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Installation job polling
    #[serde(default)]
    pub poll: PollSettings,
}

fn default_true() -> bool {
    true
}

fn default_request_timeout() -> u64 {
    60
}

/// Installation job polling settings
#[derive(Debug, Clone, Deserialize)]
pub struct PollSettings {
    /// Initial delay between status queries in seconds
    #[serde(default = "default_poll_interval")]
    pub interval_secs: u64,

    /// Upper bound on the delay between status queries in seconds
    #[serde(default = "default_max_poll_interval")]
    pub max_interval_secs: u64,

    /// Overall time to wait for a terminal status in seconds
    #[serde(default = "default_poll_timeout")]
    pub timeout_secs: u64,

    /// Consecutive failed status queries tolerated before giving up
    #[serde(default = "default_max_query_retries")]
    pub max_query_retries: u32,
}

fn default_poll_interval() -> u64 {
    5
}

fn default_max_poll_interval() -> u64 {
    60
}

fn default_poll_timeout() -> u64 {
    4 * 60 * 60
}

fn default_max_query_retries() -> u32 {
    5
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_secs: default_poll_interval(),
            max_interval_secs: default_max_poll_interval(),
            timeout_secs: default_poll_timeout(),
            max_query_retries: default_max_query_retries(),
        }
    }
}

impl From<&PollSettings> for poller::Options {
    fn from(settings: &PollSettings) -> Self {
        Self {
            interval: Duration::from_secs(settings.interval_secs),
            max_interval: Duration::from_secs(settings.max_interval_secs.max(settings.interval_secs)),
            timeout: Duration::from_secs(settings.timeout_secs),
            max_query_retries: settings.max_query_retries,
        }
    }
}

/// The release a run converges the appliance to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredRelease {
    /// Product name
    pub name: String,

    /// Parsed desired version
    pub version: Version,

    /// Desired version exactly as configured, used for catalog matching and
    /// the upgrade call
    pub raw_version: String,

    /// Product artifact
    pub filepath: PathBuf,

    /// Desired installation settings template
    pub settings_template: PathBuf,

    /// Stemcell imported before any installation work
    pub stemcell: Option<PathBuf>,
}

impl DeploymentConfig {
    /// Load and validate a deployment file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, DeployerError> {
        let file = File::new(path.as_ref());
        if !file.exists().await {
            return Err(DeployerError::ConfigError(format!(
                "Deployment file not found: {}",
                file.path().display()
            )));
        }
        let config: DeploymentConfig = file.read_yaml().await?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a deployment file from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self, DeployerError> {
        let config: DeploymentConfig = serde_norway::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot possibly work
    pub fn validate(&self) -> Result<(), DeployerError> {
        let required = [
            ("name", self.name.trim().is_empty()),
            ("target", self.target.trim().is_empty()),
            ("username", self.username.trim().is_empty()),
            ("password", self.password.expose_secret().is_empty()),
            ("filepath", self.filepath.as_os_str().is_empty()),
            (
                "installation_settings_file",
                self.installation_settings_file.as_os_str().is_empty(),
            ),
        ];
        if let Some((field, _)) = required.iter().find(|(_, missing)| *missing) {
            return Err(DeployerError::ConfigError(format!("Missing required field: {}", field)));
        }

        Version::parse(&self.desired_version)?;
        Ok(())
    }

    /// The release this configuration asks for
    pub fn desired_release(&self) -> Result<DesiredRelease, DeployerError> {
        Ok(DesiredRelease {
            name: self.name.clone(),
            version: Version::parse(&self.desired_version)?,
            raw_version: self.desired_version.trim().to_string(),
            filepath: self.filepath.clone(),
            settings_template: self.installation_settings_file.clone(),
            stemcell: self.stemcell.clone(),
        })
    }

    /// The appliance this configuration points at
    pub fn target(&self) -> Result<Target, DeployerError> {
        Target::new(
            &self.target,
            &self.username,
            SecretString::from(self.password.expose_secret().to_owned()),
            self.insecure_skip_tls_verify,
            Duration::from_secs(self.request_timeout_secs),
        )
    }

    /// Poller options for installation jobs
    pub fn poller_options(&self) -> poller::Options {
        poller::Options::from(&self.poll)
    }
}
