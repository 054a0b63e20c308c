//! Deploy / upgrade / skip decision

use std::cmp::Ordering;
use std::fmt;

use crate::deploy::installation::InstallationRecord;
use crate::errors::DeployerError;
use crate::version::Version;

/// What a run does to the appliance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentAction {
    /// Full settings application from scratch
    Deploy,

    /// Bind the existing installation to the desired version
    Upgrade { guid: String, from: Version },

    /// Leave the appliance alone, an installation job is pending
    Skip,
}

impl fmt::Display for DeploymentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentAction::Deploy => f.write_str("deploy"),
            DeploymentAction::Upgrade { from, .. } => write!(f, "upgrade from {}", from),
            DeploymentAction::Skip => f.write_str("skip"),
        }
    }
}

/// Choose the action for an installation and a desired version
///
/// | installed | prepared | installed vs desired | action   |
/// |-----------|----------|----------------------|----------|
/// | no        |          |                      | deploy   |
/// | forced    |          |                      | deploy   |
/// | yes       | no       |                      | skip     |
/// | yes       | yes      | older                | upgrade  |
/// | yes       | yes      | same                 | deploy   |
/// | yes       | yes      | newer                | error    |
pub fn decide(
    record: Option<&InstallationRecord>,
    desired: &Version,
    forced: bool,
) -> Result<DeploymentAction, DeployerError> {
    let action = match (record, forced) {
        (None, _) | (Some(_), true) => DeploymentAction::Deploy,
        (Some(record), false) if !record.prepared => DeploymentAction::Skip,
        (Some(record), false) => match record.current_version.cmp(desired) {
            Ordering::Less => DeploymentAction::Upgrade {
                guid: record.guid.clone(),
                from: record.current_version.clone(),
            },
            Ordering::Equal => DeploymentAction::Deploy,
            Ordering::Greater => {
                return Err(DeployerError::DowngradeRefused {
                    current: record.current_version.to_string(),
                    desired: desired.to_string(),
                });
            }
        },
    };
    Ok(action)
}
