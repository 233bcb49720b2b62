//! Technical indicator implementations.
//!
//! Series-valued indicators share the same shape:
//! - `IndicatorPoint`: a single point in an indicator time series
//! - `IndicatorValue`: enum for the different indicator output shapes
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorSeries`: a time series of indicator values, one point per bar
//!
//! Single-bar and trailing-window classifiers (`alignment`, `candlestick`,
//! `levels`) return plain values.

pub mod alignment;
pub mod candlestick;
pub mod ema;
pub mod levels;
pub mod macd;
pub mod rsi;

pub use ema::calculate_ema;

use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone)]
pub struct IndicatorPoint {
    pub timestamp: DateTime<Utc>,
    pub valid: bool,
    pub value: IndicatorValue,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorValue {
    Simple(f64),
    Macd {
        line: f64,
        signal: f64,
        histogram: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
}

#[derive(Debug, Clone)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Value of the most recent point, `None` if the series is empty or the
    /// last point is still in warmup.
    pub fn latest(&self) -> Option<IndicatorValue> {
        self.values.last().filter(|p| p.valid).map(|p| p.value)
    }

    /// Value of the point before the most recent one.
    pub fn previous(&self) -> Option<IndicatorValue> {
        let len = self.values.len();
        if len < 2 {
            return None;
        }
        let point = &self.values[len - 2];
        point.valid.then_some(point.value)
    }

    /// Latest simple value, NaN when unavailable.
    pub fn latest_simple(&self) -> f64 {
        match self.latest() {
            Some(IndicatorValue::Simple(v)) => v,
            _ => f64::NAN,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(span) => write!(f, "EMA({})", span),
            IndicatorType::Rsi(window) => write!(f, "RSI({})", window),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
        }
    }
}
