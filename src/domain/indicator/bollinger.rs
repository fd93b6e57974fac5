//! Bollinger Bands.
//!
//! Upper/Lower = SMA(period) ± multiplier × rolling sample stddev.
//! Warmup: first (period-1) bars are invalid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::rolling;

pub fn calculate_bollinger(
    bars: &[OhlcvBar],
    period: usize,
    stddev_mult_x100: u32,
) -> IndicatorSeries {
    let closes = rolling::closes(bars);
    let mean = rolling::rolling_mean(&closes, period);
    let std = rolling::rolling_std(&closes, period);
    let mult = stddev_mult_x100 as f64 / 100.0;

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let upper = mean[i] + mult * std[i];
            let lower = mean[i] - mult * std[i];
            IndicatorPoint {
                date: bar.date,
                valid: !upper.is_nan(),
                value: IndicatorValue::Bollinger { upper, lower },
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Bollinger {
            period,
            stddev_mult_x100,
        },
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                code: "TEST".into(),
                exchange: "TEST".into(),
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    fn band(p: &IndicatorPoint) -> (f64, f64) {
        match p.value {
            IndicatorValue::Bollinger { upper, lower } => (upper, lower),
            _ => panic!("expected Bollinger value"),
        }
    }

    #[test]
    fn bollinger_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_bollinger(&bars, 3, 200);

        assert!(!series.values[0].valid);
        assert!(!series.values[1].valid);
        assert!(series.values[2].valid);
        assert!(series.values[3].valid);
    }

    #[test]
    fn bollinger_constant_series_collapses_to_price() {
        let bars = make_bars(&[100.0; 6]);
        let series = calculate_bollinger(&bars, 4, 200);
        for p in series.values.iter().filter(|p| p.valid) {
            let (upper, lower) = band(p);
            assert_relative_eq!(upper, 100.0);
            assert_relative_eq!(lower, 100.0);
        }
    }

    #[test]
    fn bollinger_bands_bracket_the_mean() {
        let bars = make_bars(&[10.0, 12.0, 11.0, 14.0, 13.0, 15.0]);
        let series = calculate_bollinger(&bars, 4, 200);
        for p in series.values.iter().filter(|p| p.valid) {
            let (upper, lower) = band(p);
            assert!(upper >= lower);
        }
    }

    #[test]
    fn bollinger_known_window() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_bollinger(&bars, 3, 200);
        let (upper, lower) = band(&series.values[2]);
        let mean = 20.0;
        let std = 10.0; // sample std of [10,20,30]
        assert_relative_eq!(upper, mean + 2.0 * std);
        assert_relative_eq!(lower, mean - 2.0 * std);
    }
}
