//! Per-ticker analysis pipeline and the sequential watchlist loop.
//!
//! Every failure below the setup stage is contained to its ticker: the
//! outcome records what happened and the batch moves on.

use std::fmt;
use std::time::Duration;

use crate::domain::advice::{build_prompt, ActionPolicy, PromptContext};
use crate::domain::backend_selector::{BackendSelector, SelectorConfig};
use crate::domain::market::BarInterval;
use crate::domain::ohlcv::normalize_series;
use crate::domain::settings::AppConfig;
use crate::domain::snapshot::{compute_snapshot, IndicatorSnapshot};
use crate::ports::backend_port::TextBackendPort;
use crate::ports::data_port::DataPort;
use crate::ports::news_port::{Headline, NewsPort};
use crate::ports::notify_port::NotifyPort;

/// Adapters the pipeline talks to. `news` and `notifier` are optional
/// features; `None` skips that step.
pub struct Services<'a> {
    pub data: &'a dyn DataPort,
    pub news: Option<&'a dyn NewsPort>,
    pub backend: &'a dyn TextBackendPort,
    pub notifier: Option<&'a dyn NotifyPort>,
}

#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub lookback_days: u32,
    pub interval: BarInterval,
    pub news_limit: usize,
    pub selector: SelectorConfig,
    pub policy: ActionPolicy,
    pub recipient: String,
    pub pause: Duration,
}

impl AnalysisSettings {
    pub fn from_config(config: &AppConfig, recipient: impl Into<String>) -> Self {
        Self {
            lookback_days: config.lookback_days,
            interval: config.interval,
            news_limit: config.news_limit,
            selector: config.selector.clone(),
            policy: config.policy.clone(),
            recipient: recipient.into(),
            pause: config.pause,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyStatus {
    Sent,
    /// Advice was not actionable, or no notifier is configured.
    NotSent,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickerOutcome {
    /// No usable price data; nothing else was attempted.
    Skipped { reason: String },
    /// Data was fine but no backend candidate produced text.
    NoAdvice {
        snapshot: Box<IndicatorSnapshot>,
        reason: String,
    },
    Advised {
        snapshot: Box<IndicatorSnapshot>,
        model: String,
        advice: String,
        actionable: bool,
        notification: NotifyStatus,
    },
}

impl TickerOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            TickerOutcome::Skipped { .. } => "skipped",
            TickerOutcome::NoAdvice { .. } => "no advice",
            TickerOutcome::Advised {
                actionable: true, ..
            } => "actionable",
            TickerOutcome::Advised { .. } => "advised",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickerReport {
    pub ticker: String,
    pub outcome: TickerOutcome,
}

impl fmt::Display for TickerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            TickerOutcome::Skipped { reason } => write!(f, "{}: skipped ({})", self.ticker, reason),
            TickerOutcome::NoAdvice { reason, .. } => {
                write!(f, "{}: no advice ({})", self.ticker, reason)
            }
            TickerOutcome::Advised {
                model,
                actionable,
                notification,
                ..
            } => {
                write!(f, "{}: advice from {}", self.ticker, model)?;
                if *actionable {
                    match notification {
                        NotifyStatus::Sent => write!(f, ", alert sent"),
                        NotifyStatus::NotSent => write!(f, ", actionable"),
                        NotifyStatus::Failed { reason } => {
                            write!(f, ", alert failed ({})", reason)
                        }
                    }
                } else {
                    Ok(())
                }
            }
        }
    }
}

pub fn alert_subject(ticker: &str) -> String {
    format!("Stock Alert: {}", ticker)
}

pub fn alert_body(ticker: &str, model: &str, advice: &str) -> String {
    format!("Advice for {} (model {}):\n\n{}", ticker, model, advice)
}

/// Run the full pipeline for one ticker.
pub fn analyze_ticker(
    ticker: &str,
    services: &Services<'_>,
    settings: &AnalysisSettings,
) -> TickerOutcome {
    let mut bars = match services
        .data
        .fetch_series(ticker, settings.lookback_days, settings.interval)
    {
        Ok(bars) => bars,
        Err(e) => {
            log::warn!("{}: skipping, {}", ticker, e);
            return TickerOutcome::Skipped {
                reason: e.to_string(),
            };
        }
    };
    normalize_series(&mut bars);

    let snapshot = match compute_snapshot(&bars) {
        Ok(s) => s,
        Err(e) => {
            log::warn!("{}: skipping, no price data ({})", ticker, e);
            return TickerOutcome::Skipped {
                reason: format!("no price data for {}", ticker),
            };
        }
    };
    log::info!(
        "{}: {} bars, price {:.2}, RSI {:.1} {}, EMA {}, MACD {}, pattern {}",
        ticker,
        snapshot.bar_count,
        snapshot.current_price,
        snapshot.rsi,
        snapshot.rsi_zone,
        snapshot.alignment,
        snapshot.macd_cross,
        snapshot.pattern
    );

    let company_name = services
        .data
        .company_name(ticker)
        .unwrap_or_else(|| ticker.to_string());
    let headlines = gather_headlines(ticker, &company_name, services.news, settings.news_limit);

    let prompt = build_prompt(&PromptContext {
        ticker,
        company_name: &company_name,
        snapshot: &snapshot,
        headlines: &headlines,
    });

    let selector = BackendSelector::new(services.backend, settings.selector.clone());
    let completion = match selector.complete(&prompt) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{}: no advice, {}", ticker, e);
            return TickerOutcome::NoAdvice {
                snapshot: Box::new(snapshot),
                reason: e.to_string(),
            };
        }
    };
    log::info!(
        "{}: advice from {} after {} attempt(s)",
        ticker,
        completion.model_id,
        completion.attempts
    );
    // the advice reaches the log whether or not an alert goes out
    log::info!("{}: advice:\n{}", ticker, completion.text);

    let actionable = settings.policy.is_actionable(&completion.text);
    let notification = if actionable {
        notify(
            ticker,
            &completion.model_id,
            &completion.text,
            services.notifier,
            &settings.recipient,
        )
    } else {
        log::info!("{}: advice not actionable", ticker);
        NotifyStatus::NotSent
    };

    TickerOutcome::Advised {
        snapshot: Box::new(snapshot),
        model: completion.model_id,
        advice: completion.text,
        actionable,
        notification,
    }
}

fn gather_headlines(
    ticker: &str,
    company_name: &str,
    news: Option<&dyn NewsPort>,
    limit: usize,
) -> Vec<Headline> {
    let Some(news) = news else {
        return Vec::new();
    };
    match news.fetch_headlines(company_name, limit) {
        Ok(mut headlines) => {
            headlines.truncate(limit);
            log::debug!("{}: {} headlines", ticker, headlines.len());
            headlines
        }
        Err(e) => {
            log::warn!("{}: continuing without news, {}", ticker, e);
            Vec::new()
        }
    }
}

fn notify(
    ticker: &str,
    model: &str,
    advice: &str,
    notifier: Option<&dyn NotifyPort>,
    recipient: &str,
) -> NotifyStatus {
    let Some(notifier) = notifier else {
        log::info!("{}: actionable advice, notifications disabled", ticker);
        return NotifyStatus::NotSent;
    };
    match notifier.send(&alert_subject(ticker), &alert_body(ticker, model, advice), recipient) {
        Ok(()) => {
            log::info!("{}: alert sent to {}", ticker, recipient);
            NotifyStatus::Sent
        }
        Err(e) => {
            log::warn!("{}: {}", ticker, e);
            NotifyStatus::Failed {
                reason: e.to_string(),
            }
        }
    }
}

/// Analyze each ticker in order, calling `pause` between tickers.
pub fn run_watchlist(
    tickers: &[String],
    services: &Services<'_>,
    settings: &AnalysisSettings,
    pause: &mut dyn FnMut(Duration),
) -> Vec<TickerReport> {
    let mut reports = Vec::with_capacity(tickers.len());

    for (i, ticker) in tickers.iter().enumerate() {
        if i > 0 && !settings.pause.is_zero() {
            log::debug!("pausing {}s before {}", settings.pause.as_secs(), ticker);
            pause(settings.pause);
        }
        log::info!("analyzing {} ({}/{})", ticker, i + 1, tickers.len());
        let outcome = analyze_ticker(ticker, services, settings);
        reports.push(TickerReport {
            ticker: ticker.clone(),
            outcome,
        });
    }

    reports
}
