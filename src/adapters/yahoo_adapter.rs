//! Yahoo Finance chart API data adapter.
//!
//! `GET {base}/v8/finance/chart/{ticker}?range={n}d&interval={iv}` returns
//! parallel arrays of timestamps and OHLCV values. Rows with any null field
//! (halted or not-yet-closed bars) are dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::adapters::http::{build_client, truncate_body};
use crate::domain::error::StockSageError;
use crate::domain::market::BarInterval;
use crate::domain::ohlcv::{normalize_series, OhlcvBar};
use crate::ports::data_port::DataPort;

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    short_name: Option<String>,
    long_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<QuoteArrays>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteArrays {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Bars and display name decoded from one chart response.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub company_name: Option<String>,
    pub bars: Vec<OhlcvBar>,
}

pub fn parse_chart(ticker: &str, body: &str) -> Result<ChartSeries, StockSageError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| StockSageError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: format!("malformed chart response: {}", e),
        })?;

    if let Some(err) = envelope.chart.error {
        return Err(StockSageError::DataUnavailable {
            ticker: ticker.to_string(),
            reason: format!(
                "{}: {}",
                err.code.unwrap_or_else(|| "error".into()),
                err.description.unwrap_or_default()
            ),
        });
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(ChartSeries {
            company_name: None,
            bars: Vec::new(),
        });
    };

    let company_name = result
        .meta
        .short_name
        .or(result.meta.long_name)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let mut bars = Vec::with_capacity(result.timestamp.len());
    for (i, &ts) in result.timestamp.iter().enumerate() {
        let field = |values: &[Option<f64>]| values.get(i).copied().flatten();
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            field(&quote.open),
            field(&quote.high),
            field(&quote.low),
            field(&quote.close),
            field(&quote.volume),
        ) else {
            continue;
        };
        let Some(timestamp) = DateTime::<Utc>::from_timestamp(ts, 0) else {
            continue;
        };
        bars.push(OhlcvBar {
            timestamp,
            open,
            high,
            low,
            close,
            volume: volume.round() as i64,
        });
    }
    normalize_series(&mut bars);

    Ok(ChartSeries { company_name, bars })
}

pub struct YahooChartAdapter {
    client: Client,
    base_url: String,
    names: RefCell<HashMap<String, String>>,
}

impl YahooChartAdapter {
    pub fn new(timeout: Duration) -> Result<Self, StockSageError> {
        Self::with_base_url(DEFAULT_BASE_URL, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, StockSageError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            names: RefCell::new(HashMap::new()),
        })
    }

    fn fetch_chart(
        &self,
        ticker: &str,
        range_days: u32,
        interval: BarInterval,
    ) -> Result<ChartSeries, StockSageError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        let unavailable = |reason: String| StockSageError::DataUnavailable {
            ticker: ticker.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .query(&[
                ("range", format!("{}d", range_days)),
                ("interval", interval.as_str().to_string()),
            ])
            .send()
            .map_err(|e| unavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| unavailable(format!("could not read response: {}", e)))?;

        // Unknown symbols come back as 404 with a chart.error payload.
        if !status.is_success() && status.as_u16() != 404 {
            return Err(unavailable(format!(
                "HTTP {}: {}",
                status.as_u16(),
                truncate_body(&body, 200)
            )));
        }

        let series = parse_chart(ticker, &body)?;
        if let Some(name) = &series.company_name {
            self.names
                .borrow_mut()
                .insert(ticker.to_string(), name.clone());
        }
        Ok(series)
    }
}

impl DataPort for YahooChartAdapter {
    fn fetch_series(
        &self,
        ticker: &str,
        lookback_days: u32,
        interval: BarInterval,
    ) -> Result<Vec<OhlcvBar>, StockSageError> {
        let series = self.fetch_chart(ticker, lookback_days, interval)?;
        log::debug!("{}: {} bars from chart API", ticker, series.bars.len());
        Ok(series.bars)
    }

    fn company_name(&self, ticker: &str) -> Option<String> {
        if let Some(name) = self.names.borrow().get(ticker) {
            return Some(name.clone());
        }
        match self.fetch_chart(ticker, 1, BarInterval::Day) {
            Ok(series) => series.company_name,
            Err(e) => {
                log::debug!("{}: no company name, {}", ticker, e);
                None
            }
        }
    }
}
