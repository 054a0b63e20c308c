//! Deployment engine
//!
//! Drives one product to its desired release on one appliance: looks up the
//! current installation, decides between deploy, upgrade and skip, performs the
//! upload and settings steps, triggers the installation and waits for it.
//!
//! The pending-job check is read-then-act. Another job may start on the
//! appliance between the lookup and the trigger; the appliance remains the
//! authority and will reject or serialize it.

use std::path::PathBuf;
use std::sync::Arc;

use colored::Colorize;
use tracing::{info, warn};

use crate::appliance::Appliance;
use crate::config::deployment::DesiredRelease;
use crate::deploy::decision::{decide, DeploymentAction};
use crate::deploy::installation::InstallationRecord;
use crate::deploy::merge::SettingsMerger;
use crate::deploy::poller::{self, InstallationJob};
use crate::errors::DeployerError;
use crate::filesys::dir::Dir;
use crate::filesys::file::File;
use crate::version::Version;

/// Engine options
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Deploy even when an installation exists
    pub forced: bool,

    /// Installation job polling
    pub poller: poller::Options,

    /// Parent of the per-run work directory
    pub work_root: PathBuf,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            forced: false,
            poller: poller::Options::default(),
            work_root: std::env::temp_dir(),
        }
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub enum DeploymentOutcome {
    /// Settings applied and installation finished
    Deployed { job: InstallationJob },

    /// Installation bound to the desired version and finished
    Upgraded { from: Version, job: InstallationJob },

    /// Nothing done, a previous installation job is still pending
    Skipped,
}

/// Deployment engine
pub struct DeploymentEngine {
    appliance: Arc<dyn Appliance>,
    merger: Arc<dyn SettingsMerger>,
    release: DesiredRelease,
    options: EngineOptions,
}

impl DeploymentEngine {
    /// Create a new deployment engine
    pub fn new(
        appliance: Arc<dyn Appliance>,
        merger: Arc<dyn SettingsMerger>,
        release: DesiredRelease,
        options: EngineOptions,
    ) -> Self {
        Self {
            appliance,
            merger,
            release,
            options,
        }
    }

    /// Fresh view of the product's installation
    pub async fn installation(&self) -> Result<Option<InstallationRecord>, DeployerError> {
        InstallationRecord::find(self.appliance.as_ref(), &self.release.name).await
    }

    /// Decide what a run would do right now
    pub async fn plan(&self) -> Result<DeploymentAction, DeployerError> {
        let record = self.installation().await?;
        decide(record.as_ref(), &self.release.version, self.options.forced)
    }

    /// Converge the appliance to the desired release
    pub async fn run(&self) -> Result<DeploymentOutcome, DeployerError> {
        if let Some(version) = self.appliance.director_version().await? {
            info!("Appliance director version: {}", version);
        }

        let action = self.plan().await?;
        info!(
            "Action for {} {}: {}",
            self.release.name, self.release.version, action
        );

        match action {
            DeploymentAction::Skip => {
                println!(
                    "{}",
                    "====> Skipping as this product has a pending installation!".red()
                );
                warn!(
                    "Skipping {}: an installation job is still pending",
                    self.release.name
                );
                Ok(DeploymentOutcome::Skipped)
            }
            DeploymentAction::Deploy => {
                self.import_stemcell().await?;
                let job = self.deploy().await?;
                Ok(DeploymentOutcome::Deployed { job })
            }
            DeploymentAction::Upgrade { guid, from } => {
                self.import_stemcell().await?;
                let job = self.upgrade(&guid, &from).await?;
                Ok(DeploymentOutcome::Upgraded { from, job })
            }
        }
    }

    async fn import_stemcell(&self) -> Result<(), DeployerError> {
        self.appliance
            .import_stemcell(self.release.stemcell.as_deref())
            .await
    }

    /// Upload the artifact unless the catalog already has it
    async fn upload(&self) -> Result<(), DeployerError> {
        println!("{}", "====> Uploading product...".green());
        if self
            .appliance
            .product_exists(&self.release.name, &self.release.version)
            .await?
        {
            println!("{}", "product already exists".green());
            info!(
                "{} {} already uploaded",
                self.release.name, self.release.raw_version
            );
            return Ok(());
        }

        self.appliance.upload_artifact(&self.release.filepath).await?;
        println!("{}", "done".green());
        Ok(())
    }

    async fn deploy(&self) -> Result<InstallationJob, DeployerError> {
        println!(
            "{}",
            format!(
                "====> Deploying {} version {}...",
                self.release.name, self.release.raw_version
            )
            .green()
        );

        let template = File::new(&self.release.settings_template);
        if !template.exists().await {
            return Err(DeployerError::ConfigError(format!(
                "Installation settings file not found: {}",
                template.path().display()
            )));
        }

        self.upload().await?;

        let work_dir = Dir::create_unique(&self.options.work_root, "opsdeploy").await?;
        let applied = self.apply_settings(&work_dir, &template).await;
        if let Err(e) = work_dir.delete().await {
            warn!("Unable to remove {}: {}", work_dir.path().display(), e);
        }
        applied?;

        let job = self.install().await?;
        println!("{}", "====> Finish!".green());
        Ok(job)
    }

    /// Download, merge and upload the installation settings
    async fn apply_settings(&self, work_dir: &Dir, template: &File) -> Result<(), DeployerError> {
        let current = work_dir.file("installation_settings.json");
        current
            .write_string(&self.appliance.download_settings().await?)
            .await?;

        let merged = self.merger.merge(current.path(), template.path()).await?;
        work_dir
            .file("merged_installation_settings.yml")
            .write_string(&merged)
            .await?;

        self.appliance.upload_settings(&merged).await?;
        info!("Uploaded merged installation settings");
        Ok(())
    }

    async fn upgrade(&self, guid: &str, from: &Version) -> Result<InstallationJob, DeployerError> {
        println!(
            "{}",
            format!(
                "====> Upgrading {} version from {} to {}...",
                self.release.name, from, self.release.raw_version
            )
            .green()
        );

        self.upload().await?;
        self.appliance
            .upgrade_installation(guid, &self.release.raw_version)
            .await?;
        info!(
            "Bound installation {} to {} {}",
            guid, self.release.name, self.release.raw_version
        );

        let job = self.install().await?;
        println!("{}", "====> Finish!".green());
        Ok(job)
    }

    /// Trigger the installation and wait for it
    async fn install(&self) -> Result<InstallationJob, DeployerError> {
        let job_id = self.appliance.trigger_install().await?;
        info!("Triggered installation {}", job_id);

        poller::wait_for_result(
            &self.options.poller,
            self.appliance.as_ref(),
            job_id,
            tokio::time::sleep,
        )
        .await
    }
}
