//! SSL Channel.
//!
//! Two SMAs (of highs and of lows) swapped by a close-position flag:
//! the flag goes +1 when close crosses above the high-SMA, -1 when it
//! crosses below the low-SMA, and is carried forward in between.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::rolling;

pub fn calculate_ssl(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    let high_sma = rolling::rolling_mean(&rolling::highs(bars), period);
    let low_sma = rolling::rolling_mean(&rolling::lows(bars), period);

    let mut last_flag: Option<i8> = None;
    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let hs = high_sma[i];
            let ls = low_sma[i];
            if !hs.is_nan() {
                if bar.close > hs {
                    last_flag = Some(1);
                } else if bar.close < ls {
                    last_flag = Some(-1);
                }
            }
            let (up, down, valid) = match last_flag {
                Some(flag) if !hs.is_nan() => {
                    if flag < 0 {
                        (ls, hs, true)
                    } else {
                        (hs, ls, true)
                    }
                }
                _ => (f64::NAN, f64::NAN, false),
            };
            IndicatorPoint {
                date: bar.date,
                valid,
                value: IndicatorValue::Ssl { up, down },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ssl(period),
        values,
    }
}
