//! Bar interval for price history requests.

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarInterval {
    FifteenMinutes,
    ThirtyMinutes,
    Hour,
    Day,
}

impl BarInterval {
    /// Interval code used in provider query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            BarInterval::FifteenMinutes => "15m",
            BarInterval::ThirtyMinutes => "30m",
            BarInterval::Hour => "1h",
            BarInterval::Day => "1d",
        }
    }
}

impl fmt::Display for BarInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bar interval '{0}' (expected 15m, 30m, 1h or 1d)")]
pub struct UnknownInterval(pub String);

impl FromStr for BarInterval {
    type Err = UnknownInterval;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "15m" => Ok(BarInterval::FifteenMinutes),
            "30m" => Ok(BarInterval::ThirtyMinutes),
            "1h" | "60m" => Ok(BarInterval::Hour),
            "1d" => Ok(BarInterval::Day),
            other => Err(UnknownInterval(other.to_string())),
        }
    }
}
