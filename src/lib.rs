//! tascreen — technical-analysis indicators and long/short screen backtesting.
//!
//! Hexagonal architecture: pure computation in [`domain`], port traits in
//! [`ports`], concrete file adapters in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
