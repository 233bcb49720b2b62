//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close (no SMA seed), then
//! EMA[i] = C[i]*k + EMA[i-1]*(1-k). Every point is valid.

use crate::domain::indicator::{IndicatorPoint, IndicatorSeries, IndicatorType, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

pub fn calculate_ema(bars: &[OhlcvBar], span: usize) -> IndicatorSeries {
    if span == 0 || bars.is_empty() {
        return IndicatorSeries {
            indicator_type: IndicatorType::Ema(span),
            values: Vec::new(),
        };
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let values = ema_values(&closes, span)
        .into_iter()
        .zip(bars)
        .map(|(ema, bar)| IndicatorPoint {
            timestamp: bar.timestamp,
            valid: true,
            value: IndicatorValue::Simple(ema),
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Ema(span),
        values,
    }
}

/// EMA over raw values, first-value seeded. Also used for the MACD signal line.
pub fn ema_values(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 || values.is_empty() {
        return Vec::new();
    }

    let k = smoothing_factor(span);
    let mut out = Vec::with_capacity(values.len());
    let mut ema = values[0];
    out.push(ema);

    for &v in &values[1..] {
        ema = v * k + ema * (1.0 - k);
        out.push(ema);
    }
    out
}

pub fn smoothing_factor(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{Duration, TimeZone, Utc};

    fn make_bars(prices: &[f64]) -> Vec<OhlcvBar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| OhlcvBar {
                timestamp: start + Duration::hours(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn ema_every_point_valid() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_ema(&bars, 3);

        assert_eq!(series.values.len(), 5);
        assert!(series.values.iter().all(|p| p.valid));
    }

    #[test]
    fn ema_seed_is_first_close() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_ema(&bars, 3);

        assert_eq!(series.values[0].value, IndicatorValue::Simple(10.0));
    }

    #[test]
    fn ema_recursive_calculation() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0]);
        let series = calculate_ema(&bars, 3);

        let k = 0.5;
        let e1 = 20.0 * k + 10.0 * (1.0 - k);
        let e2 = 30.0 * k + e1 * (1.0 - k);
        let e3 = 40.0 * k + e2 * (1.0 - k);

        assert_eq!(series.values[1].value, IndicatorValue::Simple(e1));
        assert_eq!(series.values[2].value, IndicatorValue::Simple(e2));
        assert_eq!(series.values[3].value, IndicatorValue::Simple(e3));
    }

    #[test]
    fn ema_span_1_tracks_price() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let values = ema_values(&[10.0, 20.0, 30.0], 1);
        assert_eq!(values, vec![10.0, 20.0, 30.0]);
        assert_eq!(calculate_ema(&bars, 1).latest_simple(), 30.0);
    }

    #[test]
    fn ema_equal_prices() {
        let values = ema_values(&[100.0; 6], 4);
        for v in values {
            assert_relative_eq!(v, 100.0);
        }
    }

    #[test]
    fn ema_timestamps_follow_bars() {
        let bars = make_bars(&[1.0, 2.0]);
        let series = calculate_ema(&bars, 5);
        assert_eq!(series.values[1].timestamp, bars[1].timestamp);
        assert_eq!(series.indicator_type, IndicatorType::Ema(5));
    }

    #[test]
    fn ema_empty_bars() {
        let series = calculate_ema(&[], 3);
        assert!(series.values.is_empty());
        assert!(ema_values(&[], 3).is_empty());
    }

    #[test]
    fn ema_span_0() {
        let bars = make_bars(&[10.0, 20.0]);
        assert!(calculate_ema(&bars, 0).values.is_empty());
    }

    #[test]
    fn ema_smoothing_factor() {
        assert_relative_eq!(smoothing_factor(10), 2.0 / 11.0);
    }
}
