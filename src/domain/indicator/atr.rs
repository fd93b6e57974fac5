//! Average True Range.
//!
//! TR = max(high-low, |high-prevClose|, |low-prevClose|); the first bar has
//! no previous close and falls back to high-low. ATR is the simple rolling
//! mean of TR over the period.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::rolling;

/// True-range series; index 0 is high-low.
pub fn true_ranges(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| {
            if i == 0 {
                bar.high - bar.low
            } else {
                bar.true_range(bars[i - 1].close)
            }
        })
        .collect()
}

/// ATR as a NaN-sentinel vector; used directly by SuperTrend.
pub fn atr_values(bars: &[OhlcvBar], period: usize) -> Vec<f64> {
    rolling::rolling_mean(&true_ranges(bars), period)
}

pub fn calculate_atr(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    IndicatorSeries::from_simple(IndicatorType::Atr(period), bars, atr_values(bars, period))
}
