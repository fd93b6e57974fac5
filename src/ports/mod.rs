//! Port traits decoupling the domain from file formats.

pub mod config_port;
pub mod data_port;
