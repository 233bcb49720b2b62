//! Indicator snapshot for one price series.
//!
//! A snapshot is built from the latest two bars plus the trailing windows of a
//! single series and is never updated in place. Indicators whose window is
//! longer than the series come out as NaN instead of failing the snapshot;
//! only an empty series is rejected.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::domain::error::InsufficientData;
use crate::domain::indicator::alignment::{ema_alignment, EmaAlignment, ALIGNMENT_SPANS};
use crate::domain::indicator::candlestick::{candlestick_pattern, CandlePattern};
use crate::domain::indicator::levels::{support_resistance, trailing_mean, DEFAULT_WINDOW};
use crate::domain::indicator::macd::{calculate_macd_default, latest_cross, MacdCross};
use crate::domain::indicator::rsi::{calculate_rsi, RsiZone, DEFAULT_WINDOW as RSI_WINDOW};
use crate::domain::indicator::{calculate_ema, IndicatorValue};
use crate::domain::ohlcv::OhlcvBar;

/// EMA spans reported in every snapshot.
pub const EMA_SPANS: [usize; 5] = [22, 30, 48, 60, 200];
pub const LONG_EMA_SPAN: usize = 200;
pub const VOLUME_WINDOW: usize = 20;
/// Bars covered by the rolling high/low.
pub const RANGE_WINDOW: usize = 50;
/// Below this many bars the long EMA is still dominated by its seed.
pub const RECOMMENDED_MIN_BARS: usize = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    pub as_of: DateTime<Utc>,
    pub bar_count: usize,
    pub current_price: f64,
    pub previous_close: f64,
    /// Highest high over the last [`RANGE_WINDOW`] bars.
    pub rolling_high: f64,
    /// Lowest low over the last [`RANGE_WINDOW`] bars.
    pub rolling_low: f64,
    pub current_volume: i64,
    pub average_volume: f64,
    /// EMA value keyed by span.
    pub emas: BTreeMap<usize, f64>,
    pub alignment: EmaAlignment,
    pub rsi: f64,
    pub rsi_zone: RsiZone,
    pub macd: f64,
    pub macd_signal: f64,
    pub macd_histogram: f64,
    pub macd_cross: MacdCross,
    pub pattern: CandlePattern,
    pub support: f64,
    pub resistance: f64,
    pub price_change_pct: f64,
    pub distance_from_long_ema_pct: f64,
}

impl IndicatorSnapshot {
    /// EMA for `span`, NaN if the span is not part of the snapshot.
    pub fn ema(&self, span: usize) -> f64 {
        self.emas.get(&span).copied().unwrap_or(f64::NAN)
    }
}

pub fn compute_snapshot(bars: &[OhlcvBar]) -> Result<IndicatorSnapshot, InsufficientData> {
    let latest = bars.last().ok_or(InsufficientData { bars: 0 })?;

    if bars.len() < RECOMMENDED_MIN_BARS {
        log::debug!(
            "series has {} bars, long EMA needs {}",
            bars.len(),
            RECOMMENDED_MIN_BARS
        );
    }

    let current_price = latest.close;
    let previous_close = if bars.len() >= 2 {
        bars[bars.len() - 2].close
    } else {
        f64::NAN
    };

    let emas: BTreeMap<usize, f64> = EMA_SPANS
        .iter()
        .map(|&span| (span, calculate_ema(bars, span).latest_simple()))
        .collect();
    let stack = ALIGNMENT_SPANS.map(|span| emas.get(&span).copied().unwrap_or(f64::NAN));

    let rsi = calculate_rsi(bars, RSI_WINDOW).latest_simple();

    let macd_series = calculate_macd_default(bars);
    let (macd, macd_signal, macd_histogram) = match macd_series.latest() {
        Some(IndicatorValue::Macd {
            line,
            signal,
            histogram,
        }) => (line, signal, histogram),
        _ => (f64::NAN, f64::NAN, f64::NAN),
    };

    let levels = support_resistance(bars, DEFAULT_WINDOW);
    let range = support_resistance(bars, RANGE_WINDOW);
    let volumes: Vec<f64> = bars.iter().map(|b| b.volume as f64).collect();
    let long_ema = emas.get(&LONG_EMA_SPAN).copied().unwrap_or(f64::NAN);

    Ok(IndicatorSnapshot {
        as_of: latest.timestamp,
        bar_count: bars.len(),
        current_price,
        previous_close,
        rolling_high: range.resistance,
        rolling_low: range.support,
        current_volume: latest.volume,
        average_volume: trailing_mean(&volumes, VOLUME_WINDOW),
        alignment: ema_alignment(current_price, stack),
        emas,
        rsi,
        rsi_zone: RsiZone::classify(rsi),
        macd,
        macd_signal,
        macd_histogram,
        macd_cross: latest_cross(&macd_series),
        pattern: candlestick_pattern(latest),
        support: levels.support,
        resistance: levels.resistance,
        price_change_pct: pct_change(previous_close, current_price),
        distance_from_long_ema_pct: pct_change(long_ema, current_price),
    })
}

fn pct_change(base: f64, value: f64) -> f64 {
    if base == 0.0 {
        return f64::NAN;
    }
    (value - base) / base * 100.0
}

struct Num(f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() {
            write!(f, "{:.2}", self.0)
        } else {
            f.write_str("n/a")
        }
    }
}

/// Multi-line technical summary used in the advice prompt and the CLI.
impl fmt::Display for IndicatorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "As of: {} ({} bars)",
            self.as_of.format("%Y-%m-%d %H:%M UTC"),
            self.bar_count
        )?;
        writeln!(
            f,
            "Price: {} (prev close {}, change {}%)",
            Num(self.current_price),
            Num(self.previous_close),
            Num(self.price_change_pct)
        )?;
        writeln!(
            f,
            "{}-bar range: {} - {}",
            RANGE_WINDOW,
            Num(self.rolling_low),
            Num(self.rolling_high)
        )?;
        writeln!(
            f,
            "Volume: {} (avg {})",
            self.current_volume,
            Num(self.average_volume)
        )?;
        let emas: Vec<String> = self
            .emas
            .iter()
            .map(|(span, v)| format!("EMA{}={}", span, Num(*v)))
            .collect();
        writeln!(f, "EMAs: {}", emas.join(", "))?;
        writeln!(f, "EMA alignment: {}", self.alignment)?;
        writeln!(
            f,
            "Distance from EMA{}: {}%",
            LONG_EMA_SPAN,
            Num(self.distance_from_long_ema_pct)
        )?;
        writeln!(f, "RSI({}): {} {}", RSI_WINDOW, Num(self.rsi), self.rsi_zone)?;
        writeln!(
            f,
            "MACD: {} signal {} histogram {} crossover {}",
            Num(self.macd),
            Num(self.macd_signal),
            Num(self.macd_histogram),
            self.macd_cross
        )?;
        writeln!(f, "Candlestick: {}", self.pattern)?;
        write!(
            f,
            "Support: {} Resistance: {}",
            Num(self.support),
            Num(self.resistance)
        )
    }
}
