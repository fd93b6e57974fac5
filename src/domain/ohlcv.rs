//! OHLCV bar representation and input validation.

use crate::domain::error::TascreenError;
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct OhlcvBar {
    pub code: String,
    pub exchange: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// (high + low) / 2
    pub fn median_price(&self) -> f64 {
        (self.high + self.low) / 2.0
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        let hl = self.high - self.low;
        let hc = (self.high - prev_close).abs();
        let lc = (self.low - prev_close).abs();
        hl.max(hc).max(lc)
    }
}

/// Fail-fast validation of a bar sequence before any computation.
///
/// Rejects empty input, non-finite OHLC fields and dates that are not
/// strictly increasing. Insufficient history for a given window is not an
/// error here; indicators report it as an invalid warm-up prefix instead.
pub fn validate_bars(bars: &[OhlcvBar]) -> Result<(), TascreenError> {
    if bars.is_empty() {
        return Err(TascreenError::InvalidInput {
            reason: "empty bar series".into(),
        });
    }

    for bar in bars {
        let fields = [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(TascreenError::InvalidInput {
                    reason: format!("non-finite {} on {}", name, bar.date),
                });
            }
        }
    }

    for pair in bars.windows(2) {
        if pair[1].date <= pair[0].date {
            return Err(TascreenError::InvalidInput {
                reason: format!(
                    "dates not strictly increasing: {} followed by {}",
                    pair[0].date, pair[1].date
                ),
            });
        }
    }

    Ok(())
}
