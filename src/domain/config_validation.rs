//! Validation of backtest parameters before a run starts.

use crate::domain::backtest::BacktestConfig;
use crate::domain::error::TascreenError;

pub fn validate_backtest_config(config: &BacktestConfig) -> Result<(), TascreenError> {
    if config.supertrend_period < 1 {
        return Err(invalid(
            "supertrend",
            "period",
            format!("must be at least 1, got {}", config.supertrend_period),
        ));
    }
    if config.supertrend_multiplier_x100 == 0 {
        return Err(invalid(
            "supertrend",
            "multiplier",
            "must be positive".into(),
        ));
    }
    if !(config.spread >= 0.0) {
        return Err(invalid(
            "costs",
            "spread",
            format!("must be non-negative, got {}", config.spread),
        ));
    }
    if !(config.fees >= 0.0) {
        return Err(invalid(
            "costs",
            "fees",
            format!("must be non-negative, got {}", config.fees),
        ));
    }
    if !config.risk_free_rate.is_finite() {
        return Err(invalid(
            "backtest",
            "risk_free_rate",
            "must be finite".into(),
        ));
    }
    if !(config.initial_capital > 0.0) {
        return Err(invalid(
            "backtest",
            "initial_capital",
            format!("must be positive, got {}", config.initial_capital),
        ));
    }
    if !(config.size_per_trade > 0.0) {
        return Err(invalid(
            "backtest",
            "size_per_trade",
            format!("must be positive, got {}", config.size_per_trade),
        ));
    }
    Ok(())
}

fn invalid(section: &str, key: &str, reason: String) -> TascreenError {
    TascreenError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason,
    }
}
