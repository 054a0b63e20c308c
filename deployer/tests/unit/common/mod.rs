//! Shared test doubles

#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use opsman_models::AvailableProduct;

use opsdeploy::appliance::Appliance;
use opsdeploy::config::deployment::DesiredRelease;
use opsdeploy::deploy::merge::SettingsMerger;
use opsdeploy::errors::DeployerError;
use opsdeploy::models::installation::{Installation, JobReport, JobStatus};
use opsdeploy::version::Version;

/// A call made against the mock appliance
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListInstallations,
    ListProducts,
    UploadArtifact(PathBuf),
    DownloadSettings,
    UploadSettings(String),
    TriggerInstall,
    InstallationStatus(u64),
    UpgradeInstallation { guid: String, version: String },
    ImportStemcell(Option<PathBuf>),
}

impl Call {
    /// Calls that change appliance state
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Call::UploadArtifact(_)
                | Call::UploadSettings(_)
                | Call::TriggerInstall
                | Call::UpgradeInstallation { .. }
                | Call::ImportStemcell(Some(_))
        )
    }
}

/// Scripted status query result
pub enum StatusStep {
    Report(JobReport),
    Unreachable,
    Missing,
}

/// In-memory appliance recording every call
pub struct MockAppliance {
    pub installations: Mutex<Result<Vec<Installation>, String>>,
    pub products: Mutex<Vec<AvailableProduct>>,
    pub settings: String,
    pub reject_settings: Option<String>,
    pub reject_upgrade: Option<String>,
    pub job_id: u64,
    pub statuses: Mutex<VecDeque<StatusStep>>,
    pub calls: Mutex<Vec<Call>>,
}

impl Default for MockAppliance {
    fn default() -> Self {
        Self {
            installations: Mutex::new(Ok(Vec::new())),
            products: Mutex::new(Vec::new()),
            settings: r#"{"products":[]}"#.to_string(),
            reject_settings: None,
            reject_upgrade: None,
            job_id: 42,
            statuses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockAppliance {
    pub fn with_installation(self, name: &str, version: &str, prepared: bool) -> Self {
        *self.installations.lock().unwrap() = Ok(vec![Installation {
            name: name.to_string(),
            version: version.to_string(),
            guid: format!("{}-guid", name),
            prepared,
        }]);
        self
    }

    pub fn unreachable(self) -> Self {
        *self.installations.lock().unwrap() = Err("connection timed out".to_string());
        self
    }

    pub fn with_product(self, name: &str, version: &str) -> Self {
        self.products.lock().unwrap().push(AvailableProduct {
            name: name.to_string(),
            product_version: version.to_string(),
        });
        self
    }

    pub fn with_statuses(self, statuses: &[JobStatus]) -> Self {
        {
            let mut steps = self.statuses.lock().unwrap();
            for status in statuses {
                steps.push_back(StatusStep::Report(JobReport::new(*status)));
            }
        }
        self
    }

    pub fn then(self, step: StatusStep) -> Self {
        self.statuses.lock().unwrap().push_back(step);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutating_calls(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutating).collect()
    }

    pub fn status_queries(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::InstallationStatus(_)))
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl Appliance for MockAppliance {
    async fn list_installations(&self) -> Result<Vec<Installation>, DeployerError> {
        self.record(Call::ListInstallations);
        self.installations
            .lock()
            .unwrap()
            .clone()
            .map_err(DeployerError::Transient)
    }

    async fn list_products(&self) -> Result<Vec<AvailableProduct>, DeployerError> {
        self.record(Call::ListProducts);
        Ok(self.products.lock().unwrap().clone())
    }

    async fn upload_artifact(&self, path: &Path) -> Result<(), DeployerError> {
        self.record(Call::UploadArtifact(path.to_path_buf()));
        Ok(())
    }

    async fn download_settings(&self) -> Result<String, DeployerError> {
        self.record(Call::DownloadSettings);
        Ok(self.settings.clone())
    }

    async fn upload_settings(&self, document: &str) -> Result<(), DeployerError> {
        self.record(Call::UploadSettings(document.to_string()));
        match &self.reject_settings {
            Some(reason) => Err(DeployerError::Settings(reason.clone())),
            None => Ok(()),
        }
    }

    async fn trigger_install(&self) -> Result<u64, DeployerError> {
        self.record(Call::TriggerInstall);
        Ok(self.job_id)
    }

    async fn installation_status(&self, job_id: u64) -> Result<JobReport, DeployerError> {
        self.record(Call::InstallationStatus(job_id));
        let step = self.statuses.lock().unwrap().pop_front();
        match step {
            Some(StatusStep::Report(report)) => Ok(report),
            Some(StatusStep::Unreachable) => {
                Err(DeployerError::Transient("host unreachable".to_string()))
            }
            Some(StatusStep::Missing) => Err(DeployerError::Installation {
                id: job_id,
                reason: "installation not found".to_string(),
            }),
            // Script exhausted: the job keeps running
            None => Ok(JobReport::new(JobStatus::Running)),
        }
    }

    async fn upgrade_installation(&self, guid: &str, version: &str) -> Result<(), DeployerError> {
        self.record(Call::UpgradeInstallation {
            guid: guid.to_string(),
            version: version.to_string(),
        });
        match &self.reject_upgrade {
            Some(reason) => Err(DeployerError::Upgrade(reason.clone())),
            None => Ok(()),
        }
    }

    async fn import_stemcell(&self, path: Option<&Path>) -> Result<(), DeployerError> {
        self.record(Call::ImportStemcell(path.map(Path::to_path_buf)));
        Ok(())
    }
}

/// Merger that concatenates base and overlay and records its inputs
#[derive(Default)]
pub struct MockMerger {
    pub inputs: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl SettingsMerger for MockMerger {
    async fn merge(&self, base: &Path, overlay: &Path) -> Result<String, DeployerError> {
        let base = tokio::fs::read_to_string(base).await?;
        let overlay = tokio::fs::read_to_string(overlay).await?;
        self.inputs
            .lock()
            .unwrap()
            .push((base.clone(), overlay.clone()));
        Ok(format!("{}\n---\n{}", base, overlay))
    }
}

/// Desired release whose settings template lives in `dir`
pub fn release(dir: &Path, name: &str, version: &str) -> DesiredRelease {
    let template = dir.join("installation_settings.yml");
    std::fs::write(&template, "products:\n- identifier: example-product\n").unwrap();
    DesiredRelease {
        name: name.to_string(),
        version: Version::parse(version).unwrap(),
        raw_version: version.to_string(),
        filepath: dir.join(format!("{}-{}.pivotal", name, version)),
        settings_template: template,
        stemcell: None,
    }
}
