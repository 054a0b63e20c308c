//! Appliance collaborator
//!
//! The narrow set of appliance operations the deployment engine depends on.
//! [`remote::HttpAppliance`] talks to a real appliance; tests substitute an
//! in-memory implementation.

pub mod remote;

use std::path::Path;

use async_trait::async_trait;
use opsman_models::AvailableProduct;
use tracing::{debug, warn};

use crate::errors::DeployerError;
use crate::models::installation::{Installation, JobReport};
use crate::version::Version;

/// Product name of the director tile itself
pub const DIRECTOR_PRODUCT: &str = "p-bosh";

/// Appliance operations used by the engine
#[async_trait]
pub trait Appliance: Send + Sync {
    /// Product installations currently bound on the appliance
    async fn list_installations(&self) -> Result<Vec<Installation>, DeployerError>;

    /// Available products catalog
    async fn list_products(&self) -> Result<Vec<AvailableProduct>, DeployerError>;

    /// Upload a product artifact
    async fn upload_artifact(&self, path: &Path) -> Result<(), DeployerError>;

    /// Download the current installation settings
    async fn download_settings(&self) -> Result<String, DeployerError>;

    /// Replace the installation settings
    ///
    /// Fails with [`DeployerError::Settings`] when the appliance rejects the
    /// document.
    async fn upload_settings(&self, document: &str) -> Result<(), DeployerError>;

    /// Start an installation job and return its id
    async fn trigger_install(&self) -> Result<u64, DeployerError>;

    /// Current status of an installation job
    ///
    /// Fails with [`DeployerError::Installation`] when the job does not exist
    /// or the status cannot be understood.
    async fn installation_status(&self, job_id: u64) -> Result<JobReport, DeployerError>;

    /// Bind an existing installation to a new product version
    ///
    /// Fails with [`DeployerError::Upgrade`] when the appliance rejects it.
    async fn upgrade_installation(&self, guid: &str, version: &str) -> Result<(), DeployerError>;

    /// Import a stemcell; nothing happens without a path
    async fn import_stemcell(&self, path: Option<&Path>) -> Result<(), DeployerError>;

    /// Whether the catalog already holds `name` at `version`
    ///
    /// Catalog versions compare padded (`1.6.4` matches `1.6.4.0`); entries
    /// whose version does not parse never match.
    async fn product_exists(&self, name: &str, version: &Version) -> Result<bool, DeployerError> {
        let products = self.list_products().await?;
        Ok(products.iter().any(|p| {
            p.name == name
                && Version::parse(&p.product_version).is_ok_and(|v| v == *version)
        }))
    }

    /// Highest director version in the catalog
    ///
    /// `None` when the catalog has no director tile or the appliance cannot be
    /// reached.
    async fn director_version(&self) -> Result<Option<Version>, DeployerError> {
        let products = match self.list_products().await {
            Ok(products) => products,
            Err(e) if e.is_transient() => {
                warn!("Unable to probe director version: {}", e);
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let mut latest: Option<Version> = None;
        for product in products.iter().filter(|p| p.name == DIRECTOR_PRODUCT) {
            match Version::parse(&product.product_version) {
                Ok(version) => {
                    if latest.as_ref().map_or(true, |l| version > *l) {
                        latest = Some(version);
                    }
                }
                Err(e) => debug!("Ignoring director tile: {}", e),
            }
        }
        Ok(latest)
    }
}
