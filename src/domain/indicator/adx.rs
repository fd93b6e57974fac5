//! Average Directional Index.
//!
//! +dm = upmove   where upmove > downmove and upmove > 0, else 0
//! -dm = downmove where downmove > upmove and downmove > 0, else 0
//! ±di = 100 · ewm(±dm / ATR, alpha = 1/period)
//! ADX = 100 · ewm(|+di - -di| / (+di + -di), alpha = 1/period)
//!
//! Measures trend strength, not direction. A flat market where both
//! directional movements vanish leaves the ratio undefined; that stays
//! undefined rather than being forced to zero.

use crate::domain::indicator::atr::atr_values;
use crate::domain::indicator::{IndicatorSeries, IndicatorType};
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::rolling;

pub fn calculate_adx(bars: &[OhlcvBar], period: usize) -> IndicatorSeries {
    if period == 0 {
        return IndicatorSeries::from_simple(
            IndicatorType::Adx(period),
            bars,
            vec![f64::NAN; bars.len()],
        );
    }

    let n = bars.len();
    let atr = atr_values(bars, period);

    let mut plus_ratio = vec![f64::NAN; n];
    let mut minus_ratio = vec![f64::NAN; n];
    for i in 1..n {
        let upmove = bars[i].high - bars[i - 1].high;
        let downmove = bars[i - 1].low - bars[i].low;
        let plus_dm = if upmove > downmove && upmove > 0.0 {
            upmove
        } else {
            0.0
        };
        let minus_dm = if downmove > upmove && downmove > 0.0 {
            downmove
        } else {
            0.0
        };
        plus_ratio[i] = plus_dm / atr[i];
        minus_ratio[i] = minus_dm / atr[i];
    }

    let alpha = 1.0 / period as f64;
    let plus_di: Vec<f64> = rolling::ewm_mean(&plus_ratio, alpha, period)
        .iter()
        .map(|v| 100.0 * v)
        .collect();
    let minus_di: Vec<f64> = rolling::ewm_mean(&minus_ratio, alpha, period)
        .iter()
        .map(|v| 100.0 * v)
        .collect();

    let dx: Vec<f64> = plus_di
        .iter()
        .zip(&minus_di)
        .map(|(&p, &m)| ((p - m) / (p + m)).abs())
        .collect();

    let values: Vec<f64> = rolling::ewm_mean(&dx, alpha, period)
        .iter()
        .map(|v| 100.0 * v)
        .collect();

    IndicatorSeries::from_simple(IndicatorType::Adx(period), bars, values)
}
