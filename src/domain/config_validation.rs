//! Configuration validation.
//!
//! Checks every INI field before a run starts. The config port itself falls
//! back to defaults on unparseable numbers, so values are re-read as strings
//! here to reject typos instead of silently ignoring them.

use crate::domain::error::StockSageError;
use crate::domain::market::BarInterval;
use crate::domain::watchlist::parse_tickers;
use crate::ports::config_port::ConfigPort;

pub fn validate_app_config(config: &dyn ConfigPort) -> Result<(), StockSageError> {
    validate_watchlist(config)?;
    validate_market(config)?;
    validate_news(config)?;
    validate_backend(config)?;
    validate_alerts(config)?;
    validate_email(config)?;
    Ok(())
}

fn validate_watchlist(config: &dyn ConfigPort) -> Result<(), StockSageError> {
    match config.get_string("watchlist", "tickers") {
        Some(s) if !s.trim().is_empty() => {
            parse_tickers(&s)?;
        }
        _ => {
            return Err(StockSageError::ConfigMissing {
                section: "watchlist".to_string(),
                key: "tickers".to_string(),
            })
        }
    }
    validate_int(config, "watchlist", "pause_seconds", 0)
}

fn validate_market(config: &dyn ConfigPort) -> Result<(), StockSageError> {
    validate_int(config, "market", "lookback_days", 1)?;
    if let Some(s) = config.get_string("market", "interval") {
        s.parse::<BarInterval>()
            .map_err(|e| StockSageError::ConfigInvalid {
                section: "market".to_string(),
                key: "interval".to_string(),
                reason: e.to_string(),
            })?;
    }
    Ok(())
}

fn validate_news(config: &dyn ConfigPort) -> Result<(), StockSageError> {
    validate_bool(config, "news", "enabled")?;
    validate_int(config, "news", "limit", 1)
}

fn validate_backend(config: &dyn ConfigPort) -> Result<(), StockSageError> {
    if let Some(url) = config.get_string("backend", "base_url") {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(StockSageError::ConfigInvalid {
                section: "backend".to_string(),
                key: "base_url".to_string(),
                reason: "base_url must be an http(s) URL".to_string(),
            });
        }
    }
    validate_int(config, "backend", "timeout_seconds", 1)?;
    validate_int(config, "backend", "max_attempts", 0)
}

fn validate_alerts(config: &dyn ConfigPort) -> Result<(), StockSageError> {
    if let Some(s) = config.get_string("alerts", "keywords") {
        if s.split(',').all(|k| k.trim().is_empty()) {
            return Err(StockSageError::ConfigInvalid {
                section: "alerts".to_string(),
                key: "keywords".to_string(),
                reason: "at least one action keyword is required".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_email(config: &dyn ConfigPort) -> Result<(), StockSageError> {
    validate_bool(config, "email", "enabled")?;
    if let Some(host) = config.get_string("email", "smtp_host") {
        if host.trim().is_empty() {
            return Err(StockSageError::ConfigMissing {
                section: "email".to_string(),
                key: "smtp_host".to_string(),
            });
        }
    }
    validate_int(config, "email", "smtp_port", 1)?;
    if config.get_int("email", "smtp_port", 465) > i64::from(u16::MAX) {
        return Err(StockSageError::ConfigInvalid {
            section: "email".to_string(),
            key: "smtp_port".to_string(),
            reason: "smtp_port must fit in 16 bits".to_string(),
        });
    }
    Ok(())
}

/// Optional integer field that must parse and be at least `min`.
fn validate_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    min: i64,
) -> Result<(), StockSageError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| StockSageError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("'{}' is not an integer", raw.trim()),
        })?;
    if value < min {
        return Err(StockSageError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must be at least {}", key, min),
        });
    }
    Ok(())
}

fn validate_bool(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), StockSageError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(());
    };
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "false" | "no" | "0" => Ok(()),
        _ => Err(StockSageError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("'{}' is not a boolean", raw.trim()),
        }),
    }
}
