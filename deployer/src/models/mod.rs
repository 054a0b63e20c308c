//! Domain models

pub mod installation;
