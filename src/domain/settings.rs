//! Typed application settings read through the config port.
//!
//! Values are assumed to have passed [`crate::domain::config_validation`];
//! anything unparseable here still surfaces as a `ConfigInvalid` error.

use std::time::Duration;

use crate::domain::advice::ActionPolicy;
use crate::domain::backend_selector::SelectorConfig;
use crate::domain::error::StockSageError;
use crate::domain::market::BarInterval;
use crate::domain::watchlist::parse_tickers;
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_PAUSE_SECONDS: i64 = 60;
pub const DEFAULT_LOOKBACK_DAYS: i64 = 30;
pub const DEFAULT_NEWS_LIMIT: i64 = 5;
pub const DEFAULT_TIMEOUT_SECONDS: i64 = 30;
pub const DEFAULT_BACKEND_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: i64 = 465;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tickers: Vec<String>,
    pub pause: Duration,
    pub lookback_days: u32,
    pub interval: BarInterval,
    pub news_enabled: bool,
    pub news_limit: usize,
    pub backend_url: String,
    pub request_timeout: Duration,
    pub selector: SelectorConfig,
    pub policy: ActionPolicy,
    pub email_enabled: bool,
    pub smtp_host: String,
    pub smtp_port: u16,
}

impl AppConfig {
    pub fn from_port(config: &dyn ConfigPort) -> Result<Self, StockSageError> {
        let tickers_str =
            config
                .get_string("watchlist", "tickers")
                .ok_or_else(|| StockSageError::ConfigMissing {
                    section: "watchlist".into(),
                    key: "tickers".into(),
                })?;
        let tickers = parse_tickers(&tickers_str)?;

        let interval = match config.get_string("market", "interval") {
            Some(s) => s.parse().map_err(|e: crate::domain::market::UnknownInterval| {
                StockSageError::ConfigInvalid {
                    section: "market".into(),
                    key: "interval".into(),
                    reason: e.to_string(),
                }
            })?,
            None => BarInterval::Hour,
        };

        let max_attempts = config.get_int("backend", "max_attempts", 0);
        let smtp_port = config.get_int("email", "smtp_port", DEFAULT_SMTP_PORT);

        Ok(Self {
            tickers,
            pause: Duration::from_secs(
                non_negative(config, "watchlist", "pause_seconds", DEFAULT_PAUSE_SECONDS)? as u64,
            ),
            lookback_days: positive(config, "market", "lookback_days", DEFAULT_LOOKBACK_DAYS)?
                as u32,
            interval,
            news_enabled: config.get_bool("news", "enabled", true),
            news_limit: positive(config, "news", "limit", DEFAULT_NEWS_LIMIT)? as usize,
            backend_url: config
                .get_string("backend", "base_url")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string()),
            request_timeout: Duration::from_secs(
                positive(config, "backend", "timeout_seconds", DEFAULT_TIMEOUT_SECONDS)? as u64,
            ),
            selector: SelectorConfig {
                max_attempts: (max_attempts > 0).then_some(max_attempts as usize),
                exclude: config
                    .get_string("backend", "exclude")
                    .map(|s| split_list(&s))
                    .unwrap_or_default(),
            },
            policy: build_policy(config),
            email_enabled: config.get_bool("email", "enabled", true),
            smtp_host: config
                .get_string("email", "smtp_host")
                .unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string()),
            smtp_port: u16::try_from(smtp_port).map_err(|_| StockSageError::ConfigInvalid {
                section: "email".into(),
                key: "smtp_port".into(),
                reason: format!("{} is not a valid port", smtp_port),
            })?,
        })
    }
}

fn build_policy(config: &dyn ConfigPort) -> ActionPolicy {
    let defaults = ActionPolicy::default();
    ActionPolicy {
        action_keywords: config
            .get_string("alerts", "keywords")
            .map(|s| split_list(&s))
            .unwrap_or(defaults.action_keywords),
        // `none` (or an empty value) drops the confidence requirement.
        confidence_markers: match config.get_string("alerts", "confidence_markers") {
            Some(s) if s.trim().eq_ignore_ascii_case("none") => Vec::new(),
            Some(s) => split_list(&s),
            None => defaults.confidence_markers,
        },
    }
}

/// Comma-separated list, trimmed, empty entries dropped.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn positive(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, StockSageError> {
    let value = config.get_int(section, key, default);
    if value <= 0 {
        return Err(StockSageError::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason: format!("{} must be positive", key),
        });
    }
    Ok(value)
}

fn non_negative(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, StockSageError> {
    let value = config.get_int(section, key, default);
    if value < 0 {
        return Err(StockSageError::ConfigInvalid {
            section: section.into(),
            key: key.into(),
            reason: format!("{} must be non-negative", key),
        });
    }
    Ok(value)
}
