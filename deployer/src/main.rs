//! opsdeploy - Entry Point
//!
//! Deploys or upgrades a product on an Ops Manager appliance from a
//! deployment file, then waits for the installation to finish.

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing::{error, info};

use opsdeploy::app::options::AppOptions;
use opsdeploy::app::run::{exit_status, run};
use opsdeploy::cli::Args;
use opsdeploy::config::deployment::DeploymentConfig;
use opsdeploy::deploy::engine::DeploymentOutcome;
use opsdeploy::logs::{init_logging, LogLevel, LogOptions};
use opsdeploy::utils::version_info;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // Print version and exit
    if args.version {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Unable to render version info: {}", e),
        }
        return ExitCode::SUCCESS;
    }

    let Some(config_path) = args.config.as_ref() else {
        eprintln!("{}", "A deployment file is required (--config <path>)".red());
        return ExitCode::FAILURE;
    };

    let config = match DeploymentConfig::load(config_path).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format!("Unable to load {}: {}", config_path.display(), e).red());
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging
    let log_level = match args.log_level.as_deref().map(str::parse::<LogLevel>) {
        Some(Ok(level)) => level,
        Some(Err(e)) => {
            eprintln!("{}", e.red());
            return ExitCode::FAILURE;
        }
        None => config.log_level,
    };
    let log_options = LogOptions {
        log_level,
        json_format: args.json_logs,
        log_file: args.log_file.clone(),
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            println!("Failed to initialize logging: {e}");
            None
        }
    };

    let options = AppOptions {
        forced: args.force,
        merge_program: args.merge_program.clone(),
        ..Default::default()
    };

    info!(
        "Deploying {} {} (forced: {})",
        config.name, config.desired_version, options.forced
    );
    let result = run(&config, &options).await;
    match &result {
        Ok(DeploymentOutcome::Skipped) => info!("Nothing to do for {}", config.name),
        Ok(DeploymentOutcome::Deployed { job }) => {
            info!("Deployed {} (installation {})", config.name, job.id)
        }
        Ok(DeploymentOutcome::Upgraded { from, job }) => info!(
            "Upgraded {} from {} (installation {})",
            config.name, from, job.id
        ),
        Err(e) => {
            error!("Deployment failed: {}", e);
            eprintln!("{}", format!("====> Deployment failed: {}", e).red());
        }
    }
    ExitCode::from(exit_status(&result))
}
