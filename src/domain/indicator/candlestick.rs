//! Single-bar candlestick classification.
//!
//! Precedence: Hammer, then Shooting Star, then Doji. A bar with a zero body
//! is always Neutral.

use std::fmt;

use crate::domain::ohlcv::OhlcvBar;

pub const DOJI_BODY_RATIO: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandlePattern {
    Hammer,
    ShootingStar,
    Doji,
    Neutral,
}

impl fmt::Display for CandlePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CandlePattern::Hammer => "HAMMER",
            CandlePattern::ShootingStar => "SHOOTING_STAR",
            CandlePattern::Doji => "DOJI",
            CandlePattern::Neutral => "NEUTRAL",
        };
        f.write_str(label)
    }
}

pub fn candlestick_pattern(bar: &OhlcvBar) -> CandlePattern {
    let body = bar.body();
    if body.is_nan() || body <= 0.0 {
        return CandlePattern::Neutral;
    }

    let upper = bar.upper_shadow();
    let lower = bar.lower_shadow();

    if lower > 2.0 * body && upper < body {
        CandlePattern::Hammer
    } else if upper > 2.0 * body && lower < body {
        CandlePattern::ShootingStar
    } else if body < DOJI_BODY_RATIO * bar.range() {
        CandlePattern::Doji
    } else {
        CandlePattern::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn candle(open: f64, high: f64, low: f64, close: f64) -> OhlcvBar {
        OhlcvBar {
            timestamp: Utc.with_ymd_and_hms(2024, 3, 4, 15, 30, 0).unwrap(),
            open,
            high,
            low,
            close,
            volume: 10_000,
        }
    }

    #[test]
    fn hammer() {
        // body 1, lower 3, upper 0.5
        let bar = candle(100.0, 101.5, 97.0, 101.0);
        assert_eq!(candlestick_pattern(&bar), CandlePattern::Hammer);
    }

    #[test]
    fn shooting_star() {
        // body 1, upper 3, lower 0.5
        let bar = candle(101.0, 104.0, 99.5, 100.0);
        assert_eq!(candlestick_pattern(&bar), CandlePattern::ShootingStar);
    }

    #[test]
    fn doji() {
        // body 0.1, shadows 1.0 each side, range 2.1
        let bar = candle(100.0, 101.1, 99.0, 100.1);
        assert_eq!(candlestick_pattern(&bar), CandlePattern::Doji);
    }

    #[test]
    fn plain_body_is_neutral() {
        let bar = candle(100.0, 105.5, 99.5, 105.0);
        assert_eq!(candlestick_pattern(&bar), CandlePattern::Neutral);
    }

    #[test]
    fn zero_body_is_neutral_not_doji() {
        let bar = candle(100.0, 102.0, 98.0, 100.0);
        assert_eq!(candlestick_pattern(&bar), CandlePattern::Neutral);
    }

    #[test]
    fn hammer_takes_precedence_over_doji() {
        // body 0.1, lower 1.2, upper 0.05: range 1.35, body < 0.135 so the
        // doji test would also pass
        let bar = candle(100.0, 100.15, 98.8, 100.1);
        assert!(bar.body() < DOJI_BODY_RATIO * bar.range());
        assert_eq!(candlestick_pattern(&bar), CandlePattern::Hammer);
    }

    #[test]
    fn shooting_star_takes_precedence_over_doji() {
        let bar = candle(100.1, 101.3, 99.95, 100.0);
        assert!(bar.body() < DOJI_BODY_RATIO * bar.range());
        assert_eq!(candlestick_pattern(&bar), CandlePattern::ShootingStar);
    }

    #[test]
    fn display_labels() {
        assert_eq!(CandlePattern::ShootingStar.to_string(), "SHOOTING_STAR");
    }
}
