//! Long/short screen orchestration: signals in, equity and metrics out.

use chrono::NaiveDate;

use crate::domain::config_validation::validate_backtest_config;
use crate::domain::equity::{
    cagr, combine_curves, equity_curve, max_drawdown, sharpe_ratio, DrawdownStats,
};
use crate::domain::error::TascreenError;
use crate::domain::metrics::{extract_trades, ScreenMetrics};
use crate::domain::ohlcv::{validate_bars, OhlcvBar};
use crate::domain::strategy::{supertrend_signals, LongShortSignals};
use crate::domain::tracker::{delay_one_bar, position_returns, track, Side};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_SUPERTREND_PERIOD: usize = 10;
pub const DEFAULT_SUPERTREND_MULTIPLIER_X100: u32 = 300;
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.025;
pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;
pub const DEFAULT_SIZE_PER_TRADE: f64 = 10_000.0;

#[derive(Debug, Clone)]
pub struct BacktestConfig {
    pub supertrend_period: usize,
    pub supertrend_multiplier_x100: u32,
    /// Bid/ask spread charged once per round trip, as a fraction.
    pub spread: f64,
    /// Annual financing rate charged daily while a position is open.
    pub fees: f64,
    pub risk_free_rate: f64,
    pub initial_capital: f64,
    pub size_per_trade: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            supertrend_period: DEFAULT_SUPERTREND_PERIOD,
            supertrend_multiplier_x100: DEFAULT_SUPERTREND_MULTIPLIER_X100,
            spread: 0.0,
            fees: 0.0,
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            size_per_trade: DEFAULT_SIZE_PER_TRADE,
        }
    }
}

impl BacktestConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, TascreenError> {
        let period = config.get_int(
            "supertrend",
            "period",
            DEFAULT_SUPERTREND_PERIOD as i64,
        );
        if period < 1 {
            return Err(TascreenError::ConfigInvalid {
                section: "supertrend".into(),
                key: "period".into(),
                reason: format!("must be at least 1, got {}", period),
            });
        }
        let multiplier = config.get_double("supertrend", "multiplier", 3.0);

        let built = Self {
            supertrend_period: period as usize,
            supertrend_multiplier_x100: (multiplier * 100.0).round() as u32,
            spread: config.get_double("costs", "spread", 0.0),
            fees: config.get_double("costs", "fees", 0.0),
            risk_free_rate: config.get_double("backtest", "risk_free_rate", DEFAULT_RISK_FREE_RATE),
            initial_capital: config.get_double(
                "backtest",
                "initial_capital",
                DEFAULT_INITIAL_CAPITAL,
            ),
            size_per_trade: config.get_double("backtest", "size_per_trade", DEFAULT_SIZE_PER_TRADE),
        };
        validate_backtest_config(&built)?;
        Ok(built)
    }
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub equity_long: Vec<f64>,
    pub equity_short: Vec<f64>,
    pub equity_combined: Vec<f64>,
    pub drawdown: DrawdownStats,
    pub drawdown_date: Option<NaiveDate>,
    pub sharpe_ratio: f64,
    pub cagr: f64,
    pub long_metrics: ScreenMetrics,
    pub short_metrics: ScreenMetrics,
}

/// Run both sides of the screen over precomputed signals.
pub fn run_long_short(
    bars: &[OhlcvBar],
    signals: &LongShortSignals,
    config: &BacktestConfig,
) -> Result<BacktestResult, TascreenError> {
    validate_bars(bars)?;
    validate_backtest_config(config)?;
    if signals.len() != bars.len() {
        return Err(TascreenError::InvalidInput {
            reason: format!(
                "signal length {} does not match bar count {}",
                signals.len(),
                bars.len()
            ),
        });
    }

    let long_realized = delay_one_bar(&track(&signals.long_entry, &signals.long_exit, Side::Long));
    let short_realized = delay_one_bar(&track(
        &signals.short_entry,
        &signals.short_exit,
        Side::Short,
    ));

    let long_returns = position_returns(bars, &long_realized, config.spread, config.fees);
    let short_returns = position_returns(bars, &short_realized, config.spread, config.fees);

    let equity_long = equity_curve(&long_returns);
    let equity_short = equity_curve(&short_returns);
    let equity_combined = combine_curves(&equity_long, &equity_short);

    let drawdown = max_drawdown(&equity_combined);
    let drawdown_date = if drawdown.max_drawdown < 0.0 {
        bars.get(drawdown.trough_index).map(|b| b.date)
    } else {
        None
    };

    let blended: Vec<f64> = long_returns
        .iter()
        .zip(&short_returns)
        .map(|(&l, &s)| 0.5 * (l + s))
        .collect();
    let sharpe = sharpe_ratio(&blended, config.risk_free_rate);

    let final_equity = equity_combined.last().copied().unwrap_or(1.0);
    let growth = cagr(final_equity, bars.len());

    let long_trades = extract_trades(bars, &long_realized, Side::Long, config.size_per_trade);
    let short_trades = extract_trades(bars, &short_realized, Side::Short, config.size_per_trade);

    Ok(BacktestResult {
        equity_long,
        equity_short,
        equity_combined,
        drawdown,
        drawdown_date,
        sharpe_ratio: sharpe,
        cagr: growth,
        long_metrics: ScreenMetrics::compute(&long_trades, config.initial_capital),
        short_metrics: ScreenMetrics::compute(&short_trades, config.initial_capital),
    })
}

/// Derive SuperTrend flip signals from the bars and run the screen.
pub fn run_supertrend_screen(
    bars: &[OhlcvBar],
    config: &BacktestConfig,
) -> Result<BacktestResult, TascreenError> {
    validate_bars(bars)?;
    let signals = supertrend_signals(
        bars,
        config.supertrend_period,
        config.supertrend_multiplier_x100,
    );
    run_long_short(bars, &signals, config)
}
