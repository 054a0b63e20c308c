//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

/// Command line arguments for the deployer
#[derive(Parser, Debug)]
#[command(name = "opsdeploy")]
#[command(about = "Deploy or upgrade a product on an Ops Manager appliance", long_about = None)]
#[command(disable_version_flag = true)]
pub struct Args {
    /// Deployment file (YAML)
    #[arg(short, long, required_unless_present = "version")]
    pub config: Option<PathBuf>,

    /// Deploy even when the product is already installed
    #[arg(short, long)]
    pub force: bool,

    /// Override the deployment file's log level (trace, debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Also write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Settings merge program
    #[arg(long, default_value = "spruce")]
    pub merge_program: String,

    /// Print version information as JSON and exit
    #[arg(short = 'V', long)]
    pub version: bool,
}
