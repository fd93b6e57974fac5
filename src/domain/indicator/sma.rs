//! Simple Moving Average.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::rolling;

pub fn calculate_sma(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let values = rolling::rolling_mean(&rolling::closes(bars), period);
    IndicatorSeries::from_simple(IndicatorType::Sma(period), bars, values)
}
