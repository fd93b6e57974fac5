//! SuperTrend: a trend-following overlay with hysteresis.
//!
//! Two ATR-offset bands are tightened into a support line and a resistance
//! line by independent forward folds, then merged: bars closing above both
//! lines are in an uptrend ("Bottom", the line rides below price on the
//! support track), bars closing below both are in a downtrend ("Top", the
//! line rides above price on the resistance track).
//!
//! Each fold keeps only the previous line value as state; there is no
//! indexing back into a mutable table. Bars where a fold produces no value
//! are forward-filled from the last active value. Bars where the merge is
//! ambiguous (bands crossing) carry the previous classification forward, and
//! a leading ambiguous prefix borrows the first classification that appears
//! later. That tie-break mirrors the observed behavior of the formula this
//! implements; it is an approximation, not something to "fix" silently.

use chrono::NaiveDate;

use crate::domain::indicator::atr::atr_values;
use crate::domain::ohlcv::OhlcvBar;
use crate::domain::rolling;

/// Per-bar trend classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Uptrend: the line acts as support below price.
    Bottom,
    /// Downtrend: the line acts as resistance above price.
    Top,
}

#[derive(Debug, Clone)]
pub struct SuperTrendPoint {
    pub date: NaiveDate,
    pub valid: bool,
    /// Chosen line: support when Bottom, resistance when Top.
    pub line: f64,
    pub support: f64,
    pub resistance: f64,
    pub trend: Option<Trend>,
}

#[derive(Debug, Clone)]
pub struct SuperTrendSeries {
    pub period: usize,
    pub multiplier_x100: u32,
    pub points: Vec<SuperTrendPoint>,
}

pub fn calculate_supertrend(
    bars: &[OhlcvBar],
    period: usize,
    multiplier_x100: u32,
) -> SuperTrendSeries {
    let n = bars.len();
    let multiplier = multiplier_x100 as f64 / 100.0;

    let atr = atr_values(bars, period);
    let median: Vec<f64> = bars.iter().map(|b| b.median_price()).collect();

    let lower_raw: Vec<f64> = (0..n).map(|i| median[i] - multiplier * atr[i]).collect();
    let upper_raw: Vec<f64> = (0..n).map(|i| median[i] + multiplier * atr[i]).collect();

    // tightening: the support candidate only ratchets up, the resistance
    // candidate only ratchets down, inside the rolling window
    let lower_band = rolling::rolling_max(&lower_raw, period);
    let upper_band = rolling::rolling_min(&upper_raw, period);

    let closes = rolling::closes(bars);
    let support = fold_support(&closes, &lower_band);
    let resistance = fold_resistance(&closes, &upper_band);

    let labels = classify(&closes, &support, &resistance);

    let points = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let trend = labels[i];
            let line = match trend {
                Some(Trend::Bottom) => support[i],
                Some(Trend::Top) => resistance[i],
                None => f64::NAN,
            };
            SuperTrendPoint {
                date: bar.date,
                valid: trend.is_some() && line.is_finite(),
                line,
                support: support[i],
                resistance: resistance[i],
                trend,
            }
        })
        .collect();

    SuperTrendSeries {
        period,
        multiplier_x100,
        points,
    }
}

/// Support-line fold. State is the previous bar's unfilled value; NaN plays
/// the "undefined" role and every comparison against it is false, which is
/// exactly the drop-through this recurrence needs.
fn fold_support(closes: &[f64], candidates: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    let mut prev = f64::NAN;
    let mut last_active = f64::NAN;

    for i in 0..closes.len() {
        let cand = candidates[i];
        let close = closes[i];

        let cur = if close < cand {
            f64::NAN
        } else if cand < prev && cand < close {
            // hold the previous value, then re-check the close once more
            if close < prev { f64::NAN } else { prev }
        } else {
            cand
        };

        prev = cur;
        if !cur.is_nan() {
            last_active = cur;
        }
        out[i] = last_active;
    }
    out
}

/// Mirror image of [`fold_support`].
fn fold_resistance(closes: &[f64], candidates: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; closes.len()];
    let mut prev = f64::NAN;
    let mut last_active = f64::NAN;

    for i in 0..closes.len() {
        let cand = candidates[i];
        let close = closes[i];

        let cur = if close > cand {
            f64::NAN
        } else if cand > prev && cand > close {
            if close > prev { f64::NAN } else { prev }
        } else {
            cand
        };

        prev = cur;
        if !cur.is_nan() {
            last_active = cur;
        }
        out[i] = last_active;
    }
    out
}

/// A bar is "Bottom" when the close sits above both lines and "Top" when it
/// sits below both. A line that has never been active does not veto the
/// classification, but at least one line must exist; with both lines defined
/// the two conditions are mutually exclusive.
fn classify(closes: &[f64], support: &[f64], resistance: &[f64]) -> Vec<Option<Trend>> {
    let mut labels: Vec<Option<Trend>> = (0..closes.len())
        .map(|i| {
            if support[i].is_nan() && resistance[i].is_nan() {
                return None;
            }
            let above_both = (support[i].is_nan() || closes[i] > support[i])
                && (resistance[i].is_nan() || closes[i] > resistance[i]);
            let below_both = (support[i].is_nan() || closes[i] < support[i])
                && (resistance[i].is_nan() || closes[i] < resistance[i]);
            match (above_both, below_both) {
                (true, false) => Some(Trend::Bottom),
                (false, true) => Some(Trend::Top),
                _ => None,
            }
        })
        .collect();

    // forward fill, then back fill the leading unresolved prefix
    let mut last = None;
    for label in labels.iter_mut() {
        match label {
            Some(t) => last = Some(*t),
            None => *label = last,
        }
    }
    if let Some(first_idx) = labels.iter().position(|l| l.is_some()) {
        let first = labels[first_idx];
        for label in labels.iter_mut().take(first_idx) {
            *label = first;
        }
    }
    labels
}
