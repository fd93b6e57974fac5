//! Vortex Indicator.
//!
//! VI+ = rollingSum(|high - prevLow|) / rollingSum(TR)
//! VI- = rollingSum(|low - prevHigh|) / rollingSum(TR)

use crate::domain::indicator::atr::true_ranges;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::rolling;

pub fn calculate_vortex(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let prev_low = rolling::shift(&rolling::lows(bars));
    let prev_high = rolling::shift(&rolling::highs(bars));

    let plus_vm: Vec<f64> = bars
        .iter()
        .zip(&prev_low)
        .map(|(b, &pl)| (b.high - pl).abs())
        .collect();
    let minus_vm: Vec<f64> = bars
        .iter()
        .zip(&prev_high)
        .map(|(b, &ph)| (b.low - ph).abs())
        .collect();

    let plus_sum = rolling::rolling_sum(&plus_vm, period);
    let minus_sum = rolling::rolling_sum(&minus_vm, period);
    let tr_sum = rolling::rolling_sum(&true_ranges(bars), period);

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let plus = plus_sum[i] / tr_sum[i];
            let minus = minus_sum[i] / tr_sum[i];
            IndicatorPoint {
                date: bar.date,
                valid: !plus.is_nan() && !minus.is_nan(),
                value: IndicatorValue::Vortex { plus, minus },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Vortex(period),
        values,
    }
}
