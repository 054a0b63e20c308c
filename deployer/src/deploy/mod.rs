//! Deployment module

pub mod decision;
pub mod engine;
pub mod installation;
pub mod merge;
pub mod poller;
