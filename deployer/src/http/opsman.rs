//! Ops Manager API endpoints

use opsman_models::{
    AvailableProduct, InstallationSettings, InstallationStatusResponse,
    TriggerInstallationResponse, UpgradeProductRequest,
};

use crate::errors::DeployerError;
use crate::filesys::file::File;
use crate::http::client::HttpClient;

const INSTALLATION_SETTINGS: &str = "/api/installation_settings";
const PRODUCTS: &str = "/api/products";
const INSTALLATION: &str = "/api/installation";
const STEMCELLS: &str = "/api/stemcells";

impl HttpClient {
    /// Download the installation settings document verbatim
    pub async fn get_installation_settings(&self) -> Result<String, DeployerError> {
        self.get_text(INSTALLATION_SETTINGS).await
    }

    /// Product installations recorded in the installation settings
    pub async fn get_installation_settings_products(&self) -> Result<InstallationSettings, DeployerError> {
        self.get(INSTALLATION_SETTINGS).await
    }

    /// Replace the installation settings
    pub async fn upload_installation_settings(&self, document: &str) -> Result<(), DeployerError> {
        self.post_bytes(
            INSTALLATION_SETTINGS,
            "installation[file]",
            "installation_settings.yml".to_string(),
            document.as_bytes().to_vec(),
        )
        .await
    }

    /// Available products catalog
    pub async fn get_available_products(&self) -> Result<Vec<AvailableProduct>, DeployerError> {
        self.get(PRODUCTS).await
    }

    /// Upload a product artifact
    pub async fn upload_product(&self, file: &File) -> Result<(), DeployerError> {
        self.post_file(PRODUCTS, "product[file]", file).await
    }

    /// Bind an installed product to a new version
    pub async fn upgrade_product_installation(&self, guid: &str, version: &str) -> Result<(), DeployerError> {
        let path = format!("{}/products/{}", INSTALLATION, guid);
        let body = UpgradeProductRequest {
            to_version: version.to_string(),
        };
        self.put_form(&path, &body).await
    }

    /// Start applying pending changes
    pub async fn trigger_installation(&self) -> Result<TriggerInstallationResponse, DeployerError> {
        self.post_empty(&format!("{}?ignore_warnings=true", INSTALLATION)).await
    }

    /// Status of an installation job
    pub async fn get_installation(&self, id: u64) -> Result<InstallationStatusResponse, DeployerError> {
        self.get(&format!("{}/{}", INSTALLATION, id)).await
    }

    /// Import a stemcell
    pub async fn import_stemcell(&self, file: &File) -> Result<(), DeployerError> {
        self.post_file(STEMCELLS, "stemcell[file]", file).await
    }
}
