//! RSI (Relative Strength Index).
//!
//! Average gain/loss are simple rolling means of the day-over-day deltas
//! split into positive and negative parts (not Wilder smoothing):
//!   RS  = avg_gain / avg_loss
//!   RSI = 100 - 100/(1 + RS)
//!
//! avg_loss = 0 with any gain present gives RS = +inf, which saturates RSI to
//! exactly 100. A constant series gives 0/0 = NaN, so the RSI stays undefined
//! after warm-up.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::rolling;

pub fn calculate_rsi(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let delta = rolling::diff(&rolling::closes(bars));

    let gains: Vec<f64> = delta
        .iter()
        .map(|&d| if d.is_nan() { d } else { d.max(0.0) })
        .collect();
    let losses: Vec<f64> = delta
        .iter()
        .map(|&d| if d.is_nan() { d } else { (-d).max(0.0) })
        .collect();

    let avg_gain = rolling::rolling_mean(&gains, period);
    let avg_loss = rolling::rolling_mean(&losses, period);

    let values: Vec<f64> = avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| {
            let rs = g / l;
            100.0 - 100.0 / (1.0 + rs)
        })
        .collect();

    IndicatorSeries::from_simple(IndicatorType::Rsi(period), bars, values)
}
