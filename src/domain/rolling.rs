//! Rolling-window and exponential primitives shared by the indicators.
//!
//! All functions take a slice and return a vector of the same length, with
//! `f64::NAN` marking entries where the window is not yet full. A window that
//! contains a NaN produces NaN, so undefined warm-up values propagate through
//! derived series instead of silently polluting sums.

use crate::domain::ohlcv::OhlcvBar;

pub fn closes(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}

pub fn opens(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter().map(|b| b.open).collect()
}

pub fn highs(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter().map(|b| b.high).collect()
}

pub fn lows(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter().map(|b| b.low).collect()
}

pub fn volumes(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter().map(|b| b.volume as f64).collect()
}

fn rolling_apply<F>(xs: &[f64], window: usize, f: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    let mut out = vec![f64::NAN; xs.len()];
    if window == 0 || xs.len() < window {
        return out;
    }
    for i in (window - 1)..xs.len() {
        let slice = &xs[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = f(slice);
    }
    out
}

pub fn rolling_sum(xs: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(xs, window, |w| w.iter().sum())
}

pub fn rolling_mean(xs: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(xs, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Sample standard deviation (divides by n-1); a window of 1 yields NaN.
pub fn rolling_std(xs: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(xs, window, |w| {
        let n = w.len() as f64;
        let mean = w.iter().sum::<f64>() / n;
        let ss: f64 = w.iter().map(|v| (v - mean) * (v - mean)).sum();
        (ss / (n - 1.0)).sqrt()
    })
}

pub fn rolling_max(xs: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(xs, window, |w| w.iter().cloned().fold(f64::MIN, f64::max))
}

pub fn rolling_min(xs: &[f64], window: usize) -> Vec<f64> {
    rolling_apply(xs, window, |w| w.iter().cloned().fold(f64::MAX, f64::min))
}

/// Exponential weighted mean, recurrence y[i] = a·x[i] + (1-a)·y[i-1] with no
/// bias adjustment. Seeded at the first finite input; outputs stay NaN until
/// `min_periods` finite observations have been folded in. NaN inputs neither
/// update the state nor produce output.
pub fn ewm_mean(xs: &[f64], alpha: f64, min_periods: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; xs.len()];
    let mut state: Option<f64> = None;
    let mut seen = 0usize;

    for (i, &x) in xs.iter().enumerate() {
        if x.is_nan() {
            continue;
        }
        let next = match state {
            None => x,
            Some(prev) => alpha * x + (1.0 - alpha) * prev,
        };
        state = Some(next);
        seen += 1;
        if seen >= min_periods {
            out[i] = next;
        }
    }
    out
}

/// Decay 2/(span+1), warm-up of span-1 entries.
pub fn ewm_span(xs: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return vec![f64::NAN; xs.len()];
    }
    ewm_mean(xs, 2.0 / (span as f64 + 1.0), span)
}

/// Day-over-day difference; NaN at index 0.
pub fn diff(xs: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; xs.len()];
    for i in 1..xs.len() {
        out[i] = xs[i] - xs[i - 1];
    }
    out
}

/// Symmetric percent change; NaN at index 0.
pub fn pct_change(xs: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; xs.len()];
    for i in 1..xs.len() {
        out[i] = (xs[i] - xs[i - 1]) / xs[i - 1];
    }
    out
}

/// Shift right by one, injecting NaN at index 0.
pub fn shift(xs: &[f64]) -> Vec<f64> {
    let mut out = vec![f64::NAN; xs.len()];
    for i in 1..xs.len() {
        out[i] = xs[i - 1];
    }
    out
}
