//! CSV file data adapter for offline analysis.
//!
//! One file per ticker, `<dir>/<TICKER>.csv`, with header
//! `timestamp,open,high,low,close,volume` and RFC 3339 timestamps.

use crate::domain::error::StockSageError;
use crate::domain::market::BarInterval;
use crate::domain::ohlcv::{normalize_series, OhlcvBar};
use crate::ports::data_port::DataPort;
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, ticker: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", ticker))
    }
}

fn parse_column<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    ticker: &str,
) -> Result<T, StockSageError>
where
    T::Err: std::fmt::Display,
{
    let raw = record
        .get(index)
        .ok_or_else(|| StockSageError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: format!("missing {} column", name),
        })?;
    raw.trim()
        .parse()
        .map_err(|e: T::Err| StockSageError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: format!("invalid {} value '{}': {}", name, raw, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_series(
        &self,
        ticker: &str,
        lookback_days: u32,
        interval: BarInterval,
    ) -> Result<Vec<OhlcvBar>, StockSageError> {
        let path = self.csv_path(ticker);
        let content = fs::read_to_string(&path).map_err(|e| StockSageError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        log::debug!(
            "{}: reading {} (interval {} is taken as-is)",
            ticker,
            path.display(),
            interval
        );

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| StockSageError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: format!("CSV parse error: {}", e),
            })?;

            let timestamp_str = record.get(0).ok_or_else(|| StockSageError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: "missing timestamp column".into(),
            })?;
            let timestamp = DateTime::parse_from_rfc3339(timestamp_str.trim())
                .map_err(|e| StockSageError::DataUnavailable {
                    ticker: ticker.to_string(),
                    reason: format!("invalid timestamp '{}': {}", timestamp_str, e),
                })?
                .with_timezone(&Utc);

            bars.push(OhlcvBar {
                timestamp,
                open: parse_column(&record, 1, "open", ticker)?,
                high: parse_column(&record, 2, "high", ticker)?,
                low: parse_column(&record, 3, "low", ticker)?,
                close: parse_column(&record, 4, "close", ticker)?,
                volume: parse_column(&record, 5, "volume", ticker)?,
            });
        }

        normalize_series(&mut bars);
        if let Some(newest) = bars.last().map(|b| b.timestamp) {
            let cutoff = newest - Duration::days(i64::from(lookback_days));
            bars.retain(|b| b.timestamp >= cutoff);
        }
        Ok(bars)
    }

    fn company_name(&self, _ticker: &str) -> Option<String> {
        None
    }
}
