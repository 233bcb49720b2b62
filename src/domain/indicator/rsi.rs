//! RSI (Relative Strength Index) indicator implementation.
//!
//! Average gain and average loss are simple rolling means over the trailing
//! `window` price changes (no Wilder smoothing):
//!
//! RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: the first `window` bars are invalid (need `window` price changes).

use std::fmt;

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub const DEFAULT_WINDOW: usize = 14;
pub const OVERSOLD_BELOW: f64 = 30.0;
pub const OVERBOUGHT_ABOVE: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsiZone {
    Oversold,
    Neutral,
    Overbought,
}

impl RsiZone {
    /// NaN classifies as neutral.
    pub fn classify(rsi: f64) -> Self {
        if rsi < OVERSOLD_BELOW {
            RsiZone::Oversold
        } else if rsi > OVERBOUGHT_ABOVE {
            RsiZone::Overbought
        } else {
            RsiZone::Neutral
        }
    }
}

impl fmt::Display for RsiZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RsiZone::Oversold => "OVERSOLD",
            RsiZone::Neutral => "NEUTRAL",
            RsiZone::Overbought => "OVERBOUGHT",
        };
        f.write_str(label)
    }
}

pub fn calculate_rsi(bars: &[OhlcvBar], window: usize) -> IndicatorSeries {
    let invalid = |b: &OhlcvBar| IndicatorPoint {
        timestamp: b.timestamp,
        valid: false,
        value: IndicatorValue::Simple(f64::NAN),
    };

    if window == 0 || bars.len() < 2 {
        return IndicatorSeries {
            indicator_type: IndicatorType::Rsi(window),
            values: bars.iter().map(invalid).collect(),
        };
    }

    let mut gains: Vec<f64> = Vec::with_capacity(bars.len() - 1);
    let mut losses: Vec<f64> = Vec::with_capacity(bars.len() - 1);
    for pair in bars.windows(2) {
        let change = pair[1].close - pair[0].close;
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let mut values = Vec::with_capacity(bars.len());
    values.push(invalid(&bars[0]));

    for (i, bar) in bars.iter().enumerate().skip(1) {
        // changes[..i] end at this bar
        if i < window {
            values.push(invalid(bar));
            continue;
        }
        let avg_gain = gains[i - window..i].iter().sum::<f64>() / window as f64;
        let avg_loss = losses[i - window..i].iter().sum::<f64>() / window as f64;
        values.push(IndicatorPoint {
            timestamp: bar.timestamp,
            valid: true,
            value: IndicatorValue::Simple(rsi_from_averages(avg_gain, avg_loss)),
        });
    }

    IndicatorSeries {
        indicator_type: IndicatorType::Rsi(window),
        values,
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
}
