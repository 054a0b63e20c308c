//! Appliance REST client

pub mod client;
pub mod opsman;
