#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::cell::RefCell;
use std::collections::HashMap;

use stocksage::domain::error::{BackendError, StockSageError};
use stocksage::domain::market::BarInterval;
pub use stocksage::domain::ohlcv::OhlcvBar;
use stocksage::ports::backend_port::{Capability, ModelInfo, TextBackendPort};
use stocksage::ports::data_port::DataPort;
use stocksage::ports::news_port::{Headline, NewsPort};
use stocksage::ports::notify_port::NotifyPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<OhlcvBar>>,
    pub names: HashMap<String, String>,
    pub errors: HashMap<String, String>,
    pub requests: RefCell<Vec<(String, u32, BarInterval)>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            names: HashMap::new(),
            errors: HashMap::new(),
            requests: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<OhlcvBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_name(mut self, ticker: &str, name: &str) -> Self {
        self.names.insert(ticker.to_string(), name.to_string());
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_series(
        &self,
        ticker: &str,
        lookback_days: u32,
        interval: BarInterval,
    ) -> Result<Vec<OhlcvBar>, StockSageError> {
        self.requests
            .borrow_mut()
            .push((ticker.to_string(), lookback_days, interval));
        if let Some(reason) = self.errors.get(ticker) {
            return Err(StockSageError::DataUnavailable {
                ticker: ticker.to_string(),
                reason: reason.clone(),
            });
        }
        Ok(self.data.get(ticker).cloned().unwrap_or_default())
    }

    fn company_name(&self, ticker: &str) -> Option<String> {
        self.names.get(ticker).cloned()
    }
}

pub struct MockNewsPort {
    pub headlines: Vec<Headline>,
    pub fail: bool,
    pub queries: RefCell<Vec<(String, usize)>>,
}

impl MockNewsPort {
    pub fn with_headlines(titles: &[&str]) -> Self {
        Self {
            headlines: titles
                .iter()
                .map(|t| Headline {
                    title: t.to_string(),
                    description: format!("{} in detail", t),
                })
                .collect(),
            fail: false,
            queries: RefCell::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            headlines: Vec::new(),
            fail: true,
            queries: RefCell::new(Vec::new()),
        }
    }
}

impl NewsPort for MockNewsPort {
    fn fetch_headlines(
        &self,
        company_name: &str,
        limit: usize,
    ) -> Result<Vec<Headline>, StockSageError> {
        self.queries
            .borrow_mut()
            .push((company_name.to_string(), limit));
        if self.fail {
            return Err(StockSageError::News {
                reason: "rate limited".into(),
            });
        }
        Ok(self.headlines.clone())
    }
}

/// Backend with a fixed model listing and a scripted reply per model.
/// Models without a scripted reply fail with a quota error.
pub struct MockBackend {
    pub models: Result<Vec<ModelInfo>, BackendError>,
    pub replies: HashMap<String, Result<String, BackendError>>,
    pub calls: RefCell<Vec<String>>,
    pub prompts: RefCell<Vec<String>>,
}

impl MockBackend {
    pub fn new(ids: &[&str]) -> Self {
        Self {
            models: Ok(ids
                .iter()
                .map(|id| ModelInfo {
                    id: id.to_string(),
                    capabilities: vec![Capability::TextCompletion],
                })
                .collect()),
            replies: HashMap::new(),
            calls: RefCell::new(Vec::new()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn listing_fails() -> Self {
        let mut backend = Self::new(&[]);
        backend.models = Err(BackendError::Status {
            status: 403,
            body: "PERMISSION_DENIED".into(),
        });
        backend
    }

    pub fn reply(mut self, id: &str, text: &str) -> Self {
        self.replies.insert(id.to_string(), Ok(text.to_string()));
        self
    }

    pub fn fail_with(mut self, id: &str, err: BackendError) -> Self {
        self.replies.insert(id.to_string(), Err(err));
        self
    }
}

impl TextBackendPort for MockBackend {
    fn list_models(&self) -> Result<Vec<ModelInfo>, BackendError> {
        self.models.clone()
    }

    fn generate(&self, model_id: &str, prompt: &str) -> Result<String, BackendError> {
        self.calls.borrow_mut().push(model_id.to_string());
        self.prompts.borrow_mut().push(prompt.to_string());
        self.replies
            .get(model_id)
            .cloned()
            .unwrap_or_else(|| {
                Err(BackendError::QuotaExceeded {
                    model: model_id.to_string(),
                })
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub subject: String,
    pub body: String,
    pub recipient: String,
}

pub struct MockNotifier {
    pub sent: RefCell<Vec<SentMessage>>,
    pub fail: bool,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: RefCell::new(Vec::new()),
            fail: true,
        }
    }
}

impl NotifyPort for MockNotifier {
    fn send(&self, subject: &str, body: &str, recipient: &str) -> Result<(), StockSageError> {
        if self.fail {
            return Err(StockSageError::Notification {
                reason: "connection refused".into(),
            });
        }
        self.sent.borrow_mut().push(SentMessage {
            subject: subject.to_string(),
            body: body.to_string(),
            recipient: recipient.to_string(),
        });
        Ok(())
    }
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 13, 30, 0).unwrap()
}

/// Hourly bars with closes following `closes`.
pub fn bars_from_closes(closes: &[f64]) -> Vec<OhlcvBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| OhlcvBar {
            timestamp: start_time() + Duration::hours(i as i64),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000 + i as i64,
        })
        .collect()
}

/// Steadily rising hourly series.
pub fn generate_bars(count: usize, start_price: f64) -> Vec<OhlcvBar> {
    let closes: Vec<f64> = (0..count).map(|i| start_price + i as f64).collect();
    bars_from_closes(&closes)
}
