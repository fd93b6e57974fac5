//! Exponential Moving Average.
//!
//! alpha = 2/(span+1), no bias adjustment: the recurrence
//! EMA[i] = alpha·C[i] + (1-alpha)·EMA[i-1] runs from bar 0, and the first
//! (span-1) outputs are masked as invalid.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::rolling;

pub fn calculate_ema(bars: &[OhlcvBar], span: usize) -> IndicatorSeries {
    let values = rolling::ewm_span(&rolling::closes(bars), span);
    IndicatorSeries::from_simple(IndicatorType::Ema(span), bars, values)
}
