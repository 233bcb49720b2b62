//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line, seeded with the first MACD value
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9. Both EMAs are seeded with
//! the first close, so every point is valid.

use std::fmt;

use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::{closes, OhlcvBar};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacdCross {
    Bullish,
    Bearish,
    None,
}

impl fmt::Display for MacdCross {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MacdCross::Bullish => "BULLISH",
            MacdCross::Bearish => "BEARISH",
            MacdCross::None => "NONE",
        };
        f.write_str(label)
    }
}

/// Compare the previous and current (macd, signal) pairs. A crossover needs
/// strict inequalities on both bars; a touch is `None`.
pub fn classify_cross(previous: (f64, f64), current: (f64, f64)) -> MacdCross {
    let (prev_macd, prev_signal) = previous;
    let (macd, signal) = current;

    if prev_macd < prev_signal && macd > signal {
        MacdCross::Bullish
    } else if prev_macd > prev_signal && macd < signal {
        MacdCross::Bearish
    } else {
        MacdCross::None
    }
}

pub fn calculate_macd(
    bars: &[OhlcvBar],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> IndicatorSeries {
    let indicator_type = IndicatorType::Macd {
        fast,
        slow,
        signal: signal_period,
    };

    if bars.is_empty() || fast == 0 || slow == 0 || signal_period == 0 {
        return IndicatorSeries {
            indicator_type,
            values: Vec::new(),
        };
    }

    let prices = closes(bars);
    let ema_fast = ema_values(&prices, fast);
    let ema_slow = ema_values(&prices, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal_line = ema_values(&macd_line, signal_period);

    let values = bars
        .iter()
        .zip(macd_line.iter().zip(&signal_line))
        .map(|(bar, (&line, &signal))| IndicatorPoint {
            timestamp: bar.timestamp,
            valid: true,
            value: IndicatorValue::Macd {
                line,
                signal,
                histogram: line - signal,
            },
        })
        .collect();

    IndicatorSeries {
        indicator_type,
        values,
    }
}

pub fn calculate_macd_default(bars: &[OhlcvBar]) -> IndicatorSeries {
    calculate_macd(bars, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}

/// Crossover between the last two points of a MACD series.
pub fn latest_cross(series: &IndicatorSeries) -> MacdCross {
    match (series.previous(), series.latest()) {
        (
            Some(IndicatorValue::Macd {
                line: prev_line,
                signal: prev_signal,
                ..
            }),
            Some(IndicatorValue::Macd { line, signal, .. }),
        ) => classify_cross((prev_line, prev_signal), (line, signal)),
        _ => MacdCross::None,
    }
}
