//! Weighted Moving Average.
//!
//! WMA(n) = (n·P[i] + (n-1)·P[i-1] + ... + 1·P[i-n+1]) / (n·(n+1)/2)
//! Warmup: first (n-1) bars are invalid.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::rolling;

pub fn calculate_wma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let closes = rolling::closes(bars);
    let mut values = vec![f64::NAN; bars.len()];

    if period > 0 {
        let divisor = (period * (period + 1)) as f64 / 2.0;
        for i in (period - 1)..bars.len() {
            let mut numerator = 0.0;
            for j in 0..period {
                numerator += (period - j) as f64 * closes[i - j];
            }
            values[i] = numerator / divisor;
        }
    }

    IndicatorSeries::from_simple(IndicatorType::Wma(period), bars, values)
}
