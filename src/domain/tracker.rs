//! Long/short position tracking and per-bar return attribution.
//!
//! Entry/exit signals fire on close prices, so the position is realized one
//! bar later (next-bar execution). Return attribution follows the execution
//! model: the opening bar earns open-to-close, the closing bar is rewritten
//! to previous-close-to-open minus the bid/ask spread, and every in-position
//! bar pays the daily slice of the financing fee.

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::rolling;

/// Per-bar position state; depends on its own previous value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionState {
    Flat,
    Long,
    Short,
}

impl PositionState {
    pub fn signum(self) -> f64 {
        match self {
            PositionState::Flat => 0.0,
            PositionState::Long => 1.0,
            PositionState::Short => -1.0,
        }
    }

    pub fn is_open(self) -> bool {
        self != PositionState::Flat
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Long,
    Short,
}

impl Side {
    fn state(self) -> PositionState {
        match self {
            Side::Long => PositionState::Long,
            Side::Short => PositionState::Short,
        }
    }
}

/// Fold entry/exit signals into a state sequence for one side.
///
/// Exit clears the state, entry sets it, otherwise the previous state
/// carries forward; the state before the first bar is Flat. When entry and
/// exit fire on the same bar the entry wins.
pub fn track(entry: &[bool], exit: &[bool], side: Side) -> Vec<PositionState> {
    debug_assert_eq!(entry.len(), exit.len());
    let mut states = Vec::with_capacity(entry.len());
    let mut prev = PositionState::Flat;

    for i in 0..entry.len() {
        let state = if entry[i] {
            side.state()
        } else if exit[i] {
            PositionState::Flat
        } else {
            prev
        };
        states.push(state);
        prev = state;
    }
    states
}

/// One-bar execution lag: the realized position is the signal-derived state
/// shifted right by one bar.
pub fn delay_one_bar(states: &[PositionState]) -> Vec<PositionState> {
    let mut realized = Vec::with_capacity(states.len());
    let mut prev = PositionState::Flat;
    for &s in states {
        realized.push(prev);
        prev = s;
    }
    realized
}

/// Per-bar strategy returns for a realized position sequence.
///
/// `spread` is charged once on exit, `fees` is an annual financing rate
/// converted to a daily cost while the position is open. Flat bars return
/// exactly zero.
pub fn position_returns(
    bars: &[OhlcvBar],
    realized: &[PositionState],
    spread: f64,
    fees: f64,
) -> Vec<f64> {
    debug_assert_eq!(bars.len(), realized.len());
    let n = bars.len();
    let pct = rolling::pct_change(&rolling::closes(bars));

    let mut returns: Vec<f64> = (0..n)
        .map(|i| {
            let r = realized[i].signum() * pct[i];
            if r.is_nan() { 0.0 } else { r }
        })
        .collect();

    // bar where the position opens: entry at that bar's open
    for i in 0..n {
        let was_flat = i == 0 || !realized[i - 1].is_open();
        if was_flat && realized[i].is_open() {
            returns[i] = (bars[i].close - bars[i].open) / bars[i].open;
        }
    }

    // bar after the position closes: the exit executed at that bar's open,
    // so the previous bar's return becomes close[i-2] → open[i-1], less the
    // spread. An exit realized on bar 1 has no two-bars-ago close and keeps
    // its base return.
    for i in 2..n {
        if !realized[i].is_open() && realized[i - 1].is_open() {
            returns[i - 1] = (bars[i - 1].open - bars[i - 2].close) / bars[i - 2].close - spread;
        }
    }

    for i in 0..n {
        returns[i] = if realized[i].is_open() {
            returns[i] - fees / 365.0
        } else {
            0.0
        };
    }
    returns
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn signal(len: usize, fire_at: &[usize]) -> Vec<bool> {
        let mut s = vec![false; len];
        for &i in fire_at {
            s[i] = true;
        }
        s
    }

    /// Bars where each open equals the previous close (no overnight gaps).
    fn continuous_bars(closes: &[f64]) -> Vec<OhlcvBar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                let open = if i == 0 { close } else { closes[i - 1] };
                OhlcvBar {
                    code: "TEST".into(),
                    exchange: "TEST".into(),
                    date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
                        + chrono::Duration::days(i as i64),
                    open,
                    high: open.max(close) + 1.0,
                    low: open.min(close) - 1.0,
                    close,
                    volume: 1000,
                }
            })
            .collect()
    }

    #[test]
    fn track_enters_and_exits() {
        let entry = signal(6, &[1]);
        let exit = signal(6, &[4]);
        let states = track(&entry, &exit, Side::Long);
        assert_eq!(
            states,
            vec![
                PositionState::Flat,
                PositionState::Long,
                PositionState::Long,
                PositionState::Long,
                PositionState::Flat,
                PositionState::Flat,
            ]
        );
    }

    #[test]
    fn track_short_side() {
        let entry = signal(4, &[0]);
        let exit = signal(4, &[2]);
        let states = track(&entry, &exit, Side::Short);
        assert_eq!(states[0], PositionState::Short);
        assert_eq!(states[1], PositionState::Short);
        assert_eq!(states[2], PositionState::Flat);
    }

    #[test]
    fn track_entry_wins_over_exit_same_bar() {
        let entry = signal(3, &[1]);
        let exit = signal(3, &[1]);
        let states = track(&entry, &exit, Side::Long);
        assert_eq!(states[1], PositionState::Long);
    }

    #[test]
    fn track_no_signals_stays_flat() {
        let states = track(&[false; 5], &[false; 5], Side::Long);
        assert!(states.iter().all(|s| *s == PositionState::Flat));
    }

    #[test]
    fn delay_injects_flat_at_start() {
        let states = vec![PositionState::Long, PositionState::Long, PositionState::Flat];
        let realized = delay_one_bar(&states);
        assert_eq!(
            realized,
            vec![PositionState::Flat, PositionState::Long, PositionState::Long]
        );
    }

    #[test]
    fn returns_zero_when_always_flat() {
        let bars = continuous_bars(&[100.0, 101.0, 102.0, 103.0]);
        let realized = vec![PositionState::Flat; 4];
        let returns = position_returns(&bars, &realized, 0.001, 0.05);
        assert!(returns.iter().all(|r| *r == 0.0));
    }

    #[test]
    fn returns_entry_bar_is_open_to_close() {
        let bars = continuous_bars(&[100.0, 110.0, 121.0, 121.0]);
        // enter realized on bar 1, stay long
        let realized = vec![
            PositionState::Flat,
            PositionState::Long,
            PositionState::Long,
            PositionState::Long,
        ];
        let returns = position_returns(&bars, &realized, 0.0, 0.0);
        // bar 1 open = 100 (prev close), close = 110
        assert_relative_eq!(returns[1], 0.10);
        assert_relative_eq!(returns[2], 0.10);
    }

    #[test]
    fn returns_exit_rewrites_previous_bar_with_spread() {
        let closes = [100.0, 100.0, 110.0, 120.0, 120.0, 120.0];
        let bars = continuous_bars(&closes);
        let realized = vec![
            PositionState::Flat,
            PositionState::Flat,
            PositionState::Long,
            PositionState::Long,
            PositionState::Flat,
            PositionState::Flat,
        ];
        let spread = 0.002;
        let returns = position_returns(&bars, &realized, spread, 0.0);

        // exit realized on bar 4 → bar 3 rewritten to close[2] → open[3]
        let expected = (bars[3].open - bars[2].close) / bars[2].close - spread;
        assert_relative_eq!(returns[3], expected);
        assert_relative_eq!(returns[4], 0.0);
    }

    #[test]
    fn returns_short_gains_when_price_falls() {
        let bars = continuous_bars(&[100.0, 100.0, 90.0, 81.0, 81.0]);
        let realized = vec![
            PositionState::Flat,
            PositionState::Flat,
            PositionState::Short,
            PositionState::Short,
            PositionState::Short,
        ];
        let returns = position_returns(&bars, &realized, 0.0, 0.0);
        // bar 3 is a plain in-position bar: -1 × pct_change = +10%
        assert_relative_eq!(returns[3], 0.10);
    }

    #[test]
    fn returns_financing_fee_only_while_open() {
        let bars = continuous_bars(&[100.0, 100.0, 100.0, 100.0]);
        let realized = vec![
            PositionState::Flat,
            PositionState::Long,
            PositionState::Long,
            PositionState::Long,
        ];
        let fees = 0.0365;
        let returns = position_returns(&bars, &realized, 0.0, fees);
        assert_relative_eq!(returns[0], 0.0);
        for r in &returns[1..] {
            assert_relative_eq!(*r, -fees / 365.0);
        }
    }

    #[test]
    fn no_illegal_transitions_through_flat() {
        // a short entry while long only takes effect through its own side's
        // tracker; a single side can never jump Long → Short
        let entry = signal(8, &[1, 5]);
        let exit = signal(8, &[3]);
        let states = track(&entry, &exit, Side::Long);
        for pair in states.windows(2) {
            let illegal = (pair[0] == PositionState::Long && pair[1] == PositionState::Short)
                || (pair[0] == PositionState::Short && pair[1] == PositionState::Long);
            assert!(!illegal);
        }
    }
}
