//! Chaikin Money Flow.
//!
//! multiplier = ((close-low) - (high-close)) / (high-low)
//! CMF = rollingSum(multiplier · volume) / rollingSum(volume)
//!
//! Bars with high == low make the multiplier undefined, and that NaN
//! propagates through every window containing the bar.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::rolling;

pub fn calculate_cmf(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let mf_volume: Vec<f64> = bars
        .iter()
        .map(|b| {
            let multiplier = ((b.close - b.low) - (b.high - b.close)) / (b.high - b.low);
            multiplier * b.volume as f64
        })
        .collect();

    let mf_sum = rolling::rolling_sum(&mf_volume, period);
    let vol_sum = rolling::rolling_sum(&rolling::volumes(bars), period);

    let values: Vec<f64> = mf_sum.iter().zip(&vol_sum).map(|(&m, &v)| m / v).collect();

    IndicatorSeries::from_simple(IndicatorType::Cmf(period), bars, values)
}
