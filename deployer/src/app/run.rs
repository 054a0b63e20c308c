//! Deployment run

use std::sync::Arc;

use tracing::info;

use crate::app::options::AppOptions;
use crate::appliance::remote::HttpAppliance;
use crate::config::deployment::DeploymentConfig;
use crate::deploy::engine::{DeploymentEngine, DeploymentOutcome};
use crate::deploy::merge::SpruceMerger;
use crate::errors::DeployerError;
use crate::http::client::HttpClient;

/// Run one deployment described by `config` against its appliance
pub async fn run(
    config: &DeploymentConfig,
    options: &AppOptions,
) -> Result<DeploymentOutcome, DeployerError> {
    let target = config.target()?;
    info!("Targeting appliance at {}", target.base());

    let http_client = Arc::new(HttpClient::new(target)?);
    let appliance = Arc::new(HttpAppliance::new(http_client));
    let merger = Arc::new(SpruceMerger::new(options.merge_program.clone()));

    let engine = DeploymentEngine::new(
        appliance,
        merger,
        config.desired_release()?,
        options.engine_options(config),
    );

    engine.run().await
}

/// Process exit status for a run: deploy, upgrade and skip succeed, any error fails
pub fn exit_status(result: &Result<DeploymentOutcome, DeployerError>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}
