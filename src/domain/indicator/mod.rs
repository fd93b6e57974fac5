//! Technical indicator implementations.
//!
//! This module provides types for representing indicator values and series:
//! - `IndicatorPoint`: a single point in an indicator time series
//! - `IndicatorValue`: enum for the different indicator output shapes
//! - `IndicatorType`: enum for indicator identity + parameters (HashMap key)
//! - `IndicatorSeries`: a time series of indicator values
//!
//! Every `calculate_*` function returns a series of the same length as its
//! input bars; warm-up entries carry `valid: false` and a NaN payload.

pub mod sma;
pub mod ema;
pub mod wma;
pub mod rsi;
pub mod macd;
pub mod bollinger;
pub mod atr;
pub mod obv;
pub mod cmf;
pub mod chop;
pub mod vortex;
pub mod adx;
pub mod ssl;
pub mod supertrend;

use chrono::NaiveDate;
use std::fmt;

use crate::domain::ohlcv::OhlcvBar;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
    Bollinger {
        upper: f64,
        lower: f64,
    },
    Vortex {
        plus: f64,
        minus: f64,
    },
    Ssl {
        up: f64,
        down: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Wma(usize),
    Rsi(usize),
    Atr(usize),
    Cmf(usize),
    Chop(usize),
    Adx(usize),
    Ssl(usize),
    Obv,
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
    Vortex(usize),
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Wrap a NaN-sentinel vector as a series of `Simple` points.
    pub(crate) fn from_simple(
        indicator_type: IndicatorType,
        bars: &[OhlcvBar],
        values: Vec<f64>,
    ) -> Self {
        debug_assert_eq!(bars.len(), values.len());
        let values = bars
            .iter()
            .zip(values)
            .map(|(bar, v)| IndicatorPoint {
                date: bar.date,
                valid: !v.is_nan(),
                value: IndicatorValue::Simple(v),
            })
            .collect();
        IndicatorSeries {
            indicator_type,
            values,
        }
    }

    /// Unwrap `Simple` payloads back into a NaN-sentinel vector.
    pub fn simple_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .map(|p| match p.value {
                IndicatorValue::Simple(v) if p.valid => v,
                _ => f64::NAN,
            })
            .collect()
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Wma(period) => write!(f, "WMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Atr(period) => write!(f, "ATR({})", period),
            IndicatorType::Cmf(period) => write!(f, "CMF({})", period),
            IndicatorType::Chop(period) => write!(f, "CHOP({})", period),
            IndicatorType::Adx(period) => write!(f, "ADX({})", period),
            IndicatorType::Ssl(period) => write!(f, "SSL({})", period),
            IndicatorType::Obv => write!(f, "OBV"),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
            IndicatorType::Vortex(period) => write!(f, "VORTEX({})", period),
        }
    }
}
