//! Trailing-window support and resistance.

use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Levels {
    pub support: f64,
    pub resistance: f64,
}

/// Min low and max high over the last `window` bars, or over every bar when
/// fewer are available. NaN for an empty slice or a zero window.
pub fn support_resistance(bars: &[OhlcvBar], window: usize) -> Levels {
    let tail = &bars[bars.len().saturating_sub(window)..];
    if tail.is_empty() {
        return Levels {
            support: f64::NAN,
            resistance: f64::NAN,
        };
    }

    Levels {
        support: tail.iter().map(|b| b.low).fold(f64::INFINITY, f64::min),
        resistance: tail.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max),
    }
}

/// Mean of `values` over the trailing `window`, NaN when nothing is available.
pub fn trailing_mean(values: &[f64], window: usize) -> f64 {
    let tail = &values[values.len().saturating_sub(window)..];
    if tail.is_empty() {
        return f64::NAN;
    }
    tail.iter().sum::<f64>() / tail.len() as f64
}
