//! Choppiness Index.
//!
//! CHOP = 100 · log10(rollingSum(TR) / (rollingMax(high) - rollingMin(low)))
//!        / log10(period)
//!
//! High values mean sideways chop, low values a directional market.

use crate::domain::indicator::atr::true_ranges;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::rolling;

pub fn calculate_chop(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let tr_sum = rolling::rolling_sum(&true_ranges(bars), period);
    let max_high = rolling::rolling_max(&rolling::highs(bars), period);
    let min_low = rolling::rolling_min(&rolling::lows(bars), period);

    let log_period = (period as f64).log10();
    let values: Vec<f64> = (0..bars.len())
        .map(|i| 100.0 * (tr_sum[i] / (max_high[i] - min_low[i])).log10() / log_period)
        .collect();

    IndicatorSeries::from_simple(IndicatorType::Chop(period), bars, values)
}
