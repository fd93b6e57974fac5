//! Equity curves, drawdown, Sharpe ratio and CAGR.

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Running product of (1 + r), seeded at 1.0 before the first bar.
pub fn equity_curve(returns: &[f64]) -> Vec<f64> {
    let mut curve = Vec::with_capacity(returns.len());
    let mut equity = 1.0;
    for r in returns {
        equity *= 1.0 + r;
        curve.push(equity);
    }
    curve
}

/// Unweighted average of two independently compounded curves.
///
/// This averages equity *levels*, not returns-before-compounding. That is a
/// deliberate simplification of the blend, not the mathematically standard
/// equal-weight rebalanced portfolio.
pub fn combine_curves(a: &[f64], b: &[f64]) -> Vec<f64> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b).map(|(&x, &y)| 0.5 * (x + y)).collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawdownStats {
    /// Most negative drawdown observed (≤ 0).
    pub max_drawdown: f64,
    /// Bar index where the maximum drawdown occurred.
    pub trough_index: usize,
    /// Longest run of consecutive bars spent in drawdown.
    pub max_duration: usize,
}

/// High-water-mark drawdown over a cumulative curve.
///
/// hwm[t] = max(hwm[t-1], curve[t]) with hwm starting at 0, and
/// dd[t] = (1 + curve[t]) / (1 + hwm[t]) - 1, which is never positive.
pub fn max_drawdown(curve: &[f64]) -> DrawdownStats {
    let mut stats = DrawdownStats {
        max_drawdown: 0.0,
        trough_index: 0,
        max_duration: 0,
    };
    if curve.len() < 2 {
        return stats;
    }

    let mut hwm = 0.0_f64;
    let mut duration = 0usize;

    for (t, &value) in curve.iter().enumerate().skip(1) {
        hwm = hwm.max(value);
        let dd = (1.0 + value) / (1.0 + hwm) - 1.0;

        if dd == 0.0 {
            duration = 0;
        } else {
            duration += 1;
            if duration > stats.max_duration {
                stats.max_duration = duration;
            }
        }
        if dd < stats.max_drawdown {
            stats.max_drawdown = dd;
            stats.trough_index = t;
        }
    }
    stats
}

/// Annualized Sharpe ratio over daily returns.
///
/// Zero variance propagates an infinite/undefined value rather than being
/// clamped; callers decide how to present it.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    if returns.is_empty() {
        return f64::NAN;
    }
    let daily_rf = risk_free_rate / TRADING_DAYS_PER_YEAR;
    let n = returns.len() as f64;

    let mean: f64 = returns.iter().map(|r| r - daily_rf).sum::<f64>() / n;
    let variance: f64 = returns
        .iter()
        .map(|r| {
            let x = (r - daily_rf) - mean;
            x * x
        })
        .sum::<f64>()
        / n;

    TRADING_DAYS_PER_YEAR.sqrt() * mean / variance.sqrt()
}

/// Compound annual growth rate from a final equity level.
pub fn cagr(final_equity: f64, bars: usize) -> f64 {
    if bars == 0 {
        return f64::NAN;
    }
    final_equity.powf(TRADING_DAYS_PER_YEAR / bars as f64) - 1.0
}
