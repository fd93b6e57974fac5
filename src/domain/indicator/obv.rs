//! On Balance Volume: cumulative volume signed by the day's return direction.

use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_obv(bars: &[OhlcvBar]) -> IndicatorSeries {
    let mut values = Vec::with_capacity(bars.len());
    let mut obv = 0.0;

    for (i, bar) in bars.iter().enumerate() {
        // first bar has no return; its volume is not counted
        let direction = if i == 0 {
            0.0
        } else if bar.close >= bars[i - 1].close {
            1.0
        } else {
            -1.0
        };
        obv += direction * bar.volume as f64;
        values.push(obv);
    }

    IndicatorSeries::from_simple(IndicatorType::Obv, bars, values)
}
