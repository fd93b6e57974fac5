//! Signal generation for the long/short SuperTrend screen.

use crate::domain::indicator::supertrend::{calculate_supertrend, Trend};
use crate::domain::ohlcv::OhlcvBar;

/// One boolean per bar for each of the four signal streams.
#[derive(Debug, Clone)]
pub struct LongShortSignals {
    pub long_entry: Vec<bool>,
    pub long_exit: Vec<bool>,
    pub short_entry: Vec<bool>,
    pub short_exit: Vec<bool>,
}

impl LongShortSignals {
    pub fn len(&self) -> usize {
        self.long_entry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.long_entry.is_empty()
    }
}

/// Derive entry/exit signals from SuperTrend classification flips.
///
/// A flip to an uptrend opens the long side and closes the short side; a
/// flip to a downtrend does the opposite. The first bar that carries any
/// classification counts as a flip, so a series that starts mid-trend still
/// opens a position.
pub fn supertrend_signals(
    bars: &[OhlcvBar],
    period: usize,
    multiplier_x100: u32,
) -> LongShortSignals {
    let n = bars.len();
    let series = calculate_supertrend(bars, period, multiplier_x100);

    let mut signals = LongShortSignals {
        long_entry: vec![false; n],
        long_exit: vec![false; n],
        short_entry: vec![false; n],
        short_exit: vec![false; n],
    };

    let mut prev: Option<Trend> = None;
    for (i, point) in series.points.iter().enumerate() {
        if let Some(trend) = point.trend {
            if prev != Some(trend) {
                match trend {
                    Trend::Bottom => {
                        signals.long_entry[i] = true;
                        signals.short_exit[i] = true;
                    }
                    Trend::Top => {
                        signals.long_exit[i] = true;
                        signals.short_entry[i] = true;
                    }
                }
            }
            prev = Some(trend);
        }
    }
    signals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(day: i64, close: f64) -> OhlcvBar {
        OhlcvBar {
            code: "TEST".into(),
            exchange: "TEST".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(day),
            open: close,
            high: close * 1.01,
            low: close * 0.99,
            close,
            volume: 1000,
        }
    }

    fn rising_then_falling(up: i64, down: i64) -> Vec<OhlcvBar> {
        let mut bars: Vec<OhlcvBar> = (0..up)
            .map(|i| make_bar(i, 100.0 * 1.01f64.powi(i as i32)))
            .collect();
        let top = bars.last().map(|b| b.close).unwrap_or(100.0);
        for i in 0..down {
            bars.push(make_bar(up + i, top * 0.93f64.powi(i as i32 + 1)));
        }
        bars
    }

    #[test]
    fn signals_match_bar_count() {
        let bars = rising_then_falling(20, 0);
        let signals = supertrend_signals(&bars, 10, 300);
        assert_eq!(signals.len(), 20);
        assert_eq!(signals.long_exit.len(), 20);
        assert_eq!(signals.short_entry.len(), 20);
        assert_eq!(signals.short_exit.len(), 20);
    }

    #[test]
    fn uptrend_opens_long_once() {
        let bars = rising_then_falling(30, 0);
        let signals = supertrend_signals(&bars, 10, 300);
        let entries = signals.long_entry.iter().filter(|&&b| b).count();
        assert_eq!(entries, 1);
        // a long entry always closes the short side on the same bar
        let entry_idx = signals.long_entry.iter().position(|&b| b).unwrap();
        assert!(signals.short_exit[entry_idx]);
        assert!(!signals.short_entry.iter().any(|&b| b));
    }

    #[test]
    fn reversal_flips_to_short() {
        let bars = rising_then_falling(25, 15);
        let signals = supertrend_signals(&bars, 10, 300);

        let long_in = signals.long_entry.iter().position(|&b| b);
        let short_in = signals.short_entry.iter().position(|&b| b);
        assert!(long_in.is_some());
        assert!(short_in.is_some());
        assert!(short_in > long_in);

        // the short entry closes the long on the same bar
        let idx = short_in.unwrap();
        assert!(signals.long_exit[idx]);
    }

    #[test]
    fn too_few_bars_yields_no_signals() {
        let bars = rising_then_falling(5, 0);
        let signals = supertrend_signals(&bars, 10, 300);
        assert!(!signals.long_entry.iter().any(|&b| b));
        assert!(!signals.short_entry.iter().any(|&b| b));
    }
}
