//! Installation settings merge

use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::errors::DeployerError;

/// Merges desired settings over the appliance's current settings
#[async_trait]
pub trait SettingsMerger: Send + Sync {
    /// Merge `overlay` over `base` and return the merged document.
    /// Values from `overlay` win.
    async fn merge(&self, base: &Path, overlay: &Path) -> Result<String, DeployerError>;
}

/// Merger shelling out to `spruce merge`
#[derive(Debug, Clone)]
pub struct SpruceMerger {
    program: String,
}

impl SpruceMerger {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for SpruceMerger {
    fn default() -> Self {
        Self::new("spruce")
    }
}

#[async_trait]
impl SettingsMerger for SpruceMerger {
    async fn merge(&self, base: &Path, overlay: &Path) -> Result<String, DeployerError> {
        info!("Merging {} over {}", overlay.display(), base.display());

        let output = Command::new(&self.program)
            .env("DEBUG", "false")
            .arg("merge")
            .arg(base)
            .arg(overlay)
            .output()
            .await
            .map_err(|e| DeployerError::Merge(format!("Failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeployerError::Merge(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        let merged = String::from_utf8(output.stdout)
            .map_err(|e| DeployerError::Merge(format!("Merged settings are not UTF-8: {}", e)))?;
        debug!("Merged settings: {} bytes", merged.len());
        Ok(merged)
    }
}
