//! EMA stack alignment.
//!
//! Bullish when price > EMA22 > EMA30 > EMA48 > EMA60, bearish when the strict
//! mirror holds, mixed otherwise. Ties and NaN fall through to mixed.

use std::fmt;

pub const ALIGNMENT_SPANS: [usize; 4] = [22, 30, 48, 60];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmaAlignment {
    Bullish,
    Bearish,
    Mixed,
}

impl fmt::Display for EmaAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EmaAlignment::Bullish => "BULLISH",
            EmaAlignment::Bearish => "BEARISH",
            EmaAlignment::Mixed => "MIXED",
        };
        f.write_str(label)
    }
}

/// `emas` are ordered shortest span first, as in [`ALIGNMENT_SPANS`].
pub fn ema_alignment(price: f64, emas: [f64; 4]) -> EmaAlignment {
    let stack = [price, emas[0], emas[1], emas[2], emas[3]];

    if stack.windows(2).all(|w| w[0] > w[1]) {
        EmaAlignment::Bullish
    } else if stack.windows(2).all(|w| w[0] < w[1]) {
        EmaAlignment::Bearish
    } else {
        EmaAlignment::Mixed
    }
}
