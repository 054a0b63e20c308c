//! Installation record lookup

use tracing::{debug, warn};

use crate::appliance::Appliance;
use crate::errors::DeployerError;
use crate::version::Version;

/// Snapshot of a product's installation on the appliance
///
/// Stale as soon as any installation work is triggered; look it up again
/// rather than reusing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationRecord {
    /// Installation guid
    pub guid: String,

    /// Installed product version
    pub current_version: Version,

    /// True when no installation job is pending
    pub prepared: bool,
}

impl InstallationRecord {
    /// Look up the installation of `name`
    ///
    /// An unreachable appliance yields `None`, as if nothing were installed.
    /// Any other failure, including an unparsable installed version,
    /// propagates.
    pub async fn find(
        appliance: &dyn Appliance,
        name: &str,
    ) -> Result<Option<InstallationRecord>, DeployerError> {
        let installations = match appliance.list_installations().await {
            Ok(installations) => installations,
            Err(e) if e.is_transient() => {
                warn!("Unable to list installations, assuming none: {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let Some(installation) = installations.into_iter().find(|i| i.name == name) else {
            debug!("No installation of {} found", name);
            return Ok(None);
        };

        let record = InstallationRecord {
            current_version: Version::parse(&installation.version)?,
            guid: installation.guid,
            prepared: installation.prepared,
        };
        debug!("Found installation of {}: {:?}", name, record);
        Ok(Some(record))
    }
}
