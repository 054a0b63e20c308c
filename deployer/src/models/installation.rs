//! Installation models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A product installation as listed by the appliance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    /// Product name
    pub name: String,

    /// Installed product version, unparsed
    pub version: String,

    /// Installation guid
    pub guid: String,

    /// True when no installation job is pending for this product
    pub prepared: bool,
}

impl From<opsman_models::ProductInstallation> for Installation {
    fn from(product: opsman_models::ProductInstallation) -> Self {
        Self {
            name: product.identifier,
            version: product.product_version,
            guid: product.guid,
            prepared: product.prepared.unwrap_or(false),
        }
    }
}

/// Status of an installation job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, not started yet
    Queued,

    /// Applying changes
    Running,

    /// Finished successfully
    Succeeded,

    /// Finished with an error
    Failed,
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "queued" | "pending" => Ok(JobStatus::Queued),
            "running" => Ok(JobStatus::Running),
            "succeeded" | "success" => Ok(JobStatus::Succeeded),
            "failed" | "failure" => Ok(JobStatus::Failed),
            _ => Err(format!("Unknown installation status: {}", s)),
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One observation of a job's status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobReport {
    pub status: JobStatus,

    /// Appliance-reported failure reason
    pub reason: Option<String>,
}

impl JobReport {
    pub fn new(status: JobStatus) -> Self {
        Self { status, reason: None }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            reason: Some(reason.into()),
        }
    }
}
