//! Appliance over the Ops Manager REST API

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use colored::Colorize;
use opsman_models::{AvailableProduct, ErrorResponse};
use tracing::{info, warn};

use crate::appliance::Appliance;
use crate::errors::DeployerError;
use crate::filesys::file::File;
use crate::http::client::HttpClient;
use crate::models::installation::{Installation, JobReport, JobStatus};

/// [`Appliance`] backed by [`HttpClient`]
pub struct HttpAppliance {
    http_client: Arc<HttpClient>,
}

impl HttpAppliance {
    pub fn new(http_client: Arc<HttpClient>) -> Self {
        Self { http_client }
    }
}

/// Prefer the structured `errors` payload over the raw body
fn error_payload(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(response) if !response.errors.is_null() => response.errors.to_string(),
        _ => body.to_string(),
    }
}

async fn existing_file(path: &Path) -> Result<File, DeployerError> {
    let file = File::new(path);
    if !file.exists().await {
        return Err(DeployerError::ConfigError(format!(
            "File not found: {}",
            path.display()
        )));
    }
    Ok(file)
}

#[async_trait]
impl Appliance for HttpAppliance {
    async fn list_installations(&self) -> Result<Vec<Installation>, DeployerError> {
        let settings = self.http_client.get_installation_settings_products().await?;
        let installations = settings
            .products
            .into_iter()
            .map(|product| {
                if product.prepared.is_none() {
                    warn!(
                        "Installation {} does not report whether it is prepared, treating it as pending",
                        product.identifier
                    );
                }
                Installation::from(product)
            })
            .collect();
        Ok(installations)
    }

    async fn list_products(&self) -> Result<Vec<AvailableProduct>, DeployerError> {
        self.http_client.get_available_products().await
    }

    async fn upload_artifact(&self, path: &Path) -> Result<(), DeployerError> {
        let file = existing_file(path).await?;
        self.http_client.upload_product(&file).await
    }

    async fn download_settings(&self) -> Result<String, DeployerError> {
        self.http_client.get_installation_settings().await
    }

    async fn upload_settings(&self, document: &str) -> Result<(), DeployerError> {
        self.http_client
            .upload_installation_settings(document)
            .await
            .map_err(|e| match e {
                DeployerError::Api { body, .. } => DeployerError::Settings(error_payload(&body)),
                other => other,
            })
    }

    async fn trigger_install(&self) -> Result<u64, DeployerError> {
        let response = self.http_client.trigger_installation().await?;
        Ok(response.install.id)
    }

    async fn installation_status(&self, job_id: u64) -> Result<JobReport, DeployerError> {
        let response = self
            .http_client
            .get_installation(job_id)
            .await
            .map_err(|e| match e {
                DeployerError::Api { status: 404, .. } => DeployerError::Installation {
                    id: job_id,
                    reason: "installation not found".to_string(),
                },
                DeployerError::Api { body, .. } => DeployerError::Installation {
                    id: job_id,
                    reason: error_payload(&body),
                },
                DeployerError::HttpError(e) if e.is_decode() => DeployerError::Installation {
                    id: job_id,
                    reason: format!("malformed status response: {}", e),
                },
                other => other,
            })?;

        let status: JobStatus = response
            .status
            .parse()
            .map_err(|reason| DeployerError::Installation { id: job_id, reason })?;

        Ok(JobReport {
            status,
            reason: response.reason,
        })
    }

    async fn upgrade_installation(&self, guid: &str, version: &str) -> Result<(), DeployerError> {
        self.http_client
            .upgrade_product_installation(guid, version)
            .await
            .map_err(|e| match e {
                DeployerError::Api { body, .. } => DeployerError::Upgrade(error_payload(&body)),
                other => other,
            })
    }

    async fn import_stemcell(&self, path: Option<&Path>) -> Result<(), DeployerError> {
        let Some(path) = path else {
            return Ok(());
        };
        println!("{}", "====> Uploading stemcell...".green());
        let file = existing_file(path).await?;
        self.http_client.import_stemcell(&file).await?;
        info!("Imported stemcell {}", path.display());
        Ok(())
    }
}
