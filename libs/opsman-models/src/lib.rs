//! Ops Manager API models
//!
//! Request and response payloads exchanged with the appliance REST API.
//! Only the fields the deployer reads are modelled; everything else in a
//! payload is ignored on deserialization.

use serde::{Deserialize, Serialize};

/// Installation settings document, as far as product installations go.
///
/// The full document is much larger; the deployer only inspects the
/// `products` array and otherwise treats the document as opaque text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InstallationSettings {
    #[serde(default)]
    pub products: Vec<ProductInstallation>,
}

/// A product bound to the current installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductInstallation {
    /// Product name (e.g. `p-bosh`, `cf`)
    pub identifier: String,

    /// Installation guid, used as the upgrade target
    pub guid: String,

    /// Product version currently bound to this installation
    pub product_version: String,

    /// False while an installation job touching this product is pending;
    /// absent on payloads that do not report it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepared: Option<bool>,
}

/// An entry of the available products catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailableProduct {
    pub name: String,
    pub product_version: String,
}

/// Upgrade request body for `PUT /api/installation/products/{guid}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeProductRequest {
    pub to_version: String,
}

/// Response of `POST /api/installation`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerInstallationResponse {
    pub install: InstallHandle,
}

/// Identifier of a triggered installation job
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InstallHandle {
    pub id: u64,
}

/// Response of `GET /api/installation/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationStatusResponse {
    pub status: String,

    /// Failure reason reported by the appliance, when it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub errors: serde_json::Value,
}
