//! Deployment configuration

pub mod deployment;
pub mod target;
