//! Application configuration options

use std::path::PathBuf;

use crate::config::deployment::DeploymentConfig;
use crate::deploy::engine::EngineOptions;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Deploy even when the product is already installed
    pub forced: bool,

    /// Settings merge program
    pub merge_program: String,

    /// Parent of the per-run work directory
    pub work_root: PathBuf,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            forced: false,
            merge_program: "spruce".to_string(),
            work_root: std::env::temp_dir(),
        }
    }
}

impl AppOptions {
    /// Engine options for a deployment file
    pub fn engine_options(&self, config: &DeploymentConfig) -> EngineOptions {
        EngineOptions {
            forced: self.forced,
            poller: config.poller_options(),
            work_root: self.work_root.clone(),
        }
    }
}
