//! Trade extraction and summary statistics for one side of the screen.

use chrono::NaiveDate;

use crate::domain::ohlcv::OhlcvBar;
use crate::domain::tracker::{PositionState, Side};

#[derive(Debug, Clone)]
pub struct ClosedTrade {
    pub side: Side,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    pub pnl: f64,
    pub holding_days: i64,
}

/// Pair realized position transitions into closed trades.
///
/// Entries execute at the open of the bar the position becomes active and
/// exits at the open of the bar it goes flat again. A position still open on
/// the last bar is assumed closed at the final close.
pub fn extract_trades(
    bars: &[OhlcvBar],
    realized: &[PositionState],
    side: Side,
    size_per_trade: f64,
) -> Vec<ClosedTrade> {
    debug_assert_eq!(bars.len(), realized.len());
    let mut trades = Vec::new();
    let mut open: Option<(usize, f64)> = None;

    let close_trade = |entry: (usize, f64), exit_date: NaiveDate, exit_price: f64| {
        let (entry_idx, entry_price) = entry;
        let units = size_per_trade / entry_price;
        let gross = units * (exit_price - entry_price);
        let pnl = match side {
            Side::Long => gross,
            Side::Short => -gross,
        };
        ClosedTrade {
            side,
            entry_date: bars[entry_idx].date,
            exit_date,
            entry_price,
            exit_price,
            pnl,
            holding_days: (exit_date - bars[entry_idx].date).num_days(),
        }
    };

    for i in 0..bars.len() {
        let was_open = i > 0 && realized[i - 1].is_open();
        match (was_open, realized[i].is_open()) {
            (false, true) => open = Some((i, bars[i].open)),
            (true, false) => {
                if let Some(entry) = open.take() {
                    trades.push(close_trade(entry, bars[i].date, bars[i].open));
                }
            }
            _ => {}
        }
    }

    // still open at the end of the sample
    if let Some(entry) = open.take() {
        if let Some(last) = bars.last() {
            trades.push(close_trade(entry, last.date, last.close));
        }
    }
    trades
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenMetrics {
    pub trades: usize,
    pub win_rate: f64,
    pub avg_win: f64,
    /// Average losing trade, as a positive magnitude.
    pub avg_loss: f64,
    pub reward_to_risk: f64,
    pub expectancy: f64,
    pub avg_holding_days: f64,
    pub net_pnl: f64,
    pub final_capital: f64,
    pub pct_gain: f64,
}

impl ScreenMetrics {
    pub fn compute(trades: &[ClosedTrade], initial_capital: f64) -> Self {
        let mut wins = 0usize;
        let mut losses = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut total_days = 0i64;
        let mut net_pnl = 0.0_f64;

        for trade in trades {
            net_pnl += trade.pnl;
            total_days += trade.holding_days;
            if trade.pnl > 0.0 {
                wins += 1;
                total_wins += trade.pnl;
            } else if trade.pnl < 0.0 {
                losses += 1;
                total_losses += trade.pnl.abs();
            }
        }

        let count = trades.len();
        let win_rate = if count > 0 {
            wins as f64 / count as f64
        } else {
            0.0
        };
        let avg_win = if wins > 0 {
            total_wins / wins as f64
        } else {
            0.0
        };
        let avg_loss = if losses > 0 {
            total_losses / losses as f64
        } else {
            0.0
        };
        let reward_to_risk = if avg_loss > 0.0 {
            avg_win / avg_loss
        } else if avg_win > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };
        let expectancy = win_rate * avg_win - (1.0 - win_rate) * avg_loss;
        let avg_holding_days = if count > 0 {
            total_days as f64 / count as f64
        } else {
            0.0
        };
        let final_capital = initial_capital + net_pnl;
        let pct_gain = if initial_capital > 0.0 {
            net_pnl / initial_capital * 100.0
        } else {
            0.0
        };

        ScreenMetrics {
            trades: count,
            win_rate,
            avg_win,
            avg_loss,
            reward_to_risk,
            expectancy,
            avg_holding_days,
            net_pnl,
            final_capital,
            pct_gain,
        }
    }
}
