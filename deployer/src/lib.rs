//! Ops Manager product deployer
//!
//! Installs or upgrades one product on an Ops Manager appliance and waits for
//! the resulting installation job to finish.

pub mod app;
pub mod appliance;
pub mod cli;
pub mod config;
pub mod deploy;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod utils;
pub mod version;
