//! Core domain types and logic.

pub mod ohlcv;
pub mod rolling;
pub mod indicator;
pub mod tracker;
pub mod equity;
pub mod metrics;
pub mod strategy;
pub mod backtest;
pub mod config_validation;
pub mod error;
