//! OHLCV bar representation.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl OhlcvBar {
    /// |close - open|
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    /// high - max(open, close)
    pub fn upper_shadow(&self) -> f64 {
        self.high - self.open.max(self.close)
    }

    /// min(open, close) - low
    pub fn lower_shadow(&self) -> f64 {
        self.open.min(self.close) - self.low
    }

    /// high - low
    pub fn range(&self) -> f64 {
        self.high - self.low
    }
}

/// Sort bars chronologically and drop repeated timestamps, keeping the last
/// bar seen for each timestamp.
pub fn normalize_series(bars: &mut Vec<OhlcvBar>) {
    bars.reverse();
    // stable sort keeps the latest duplicate first after the reverse
    bars.sort_by_key(|b| b.timestamp);
    bars.dedup_by_key(|b| b.timestamp);
}

/// Closing prices of a series, in order.
pub fn closes(bars: &[OhlcvBar]) -> Vec<f64> {
    bars.iter().map(|b| b.close).collect()
}
