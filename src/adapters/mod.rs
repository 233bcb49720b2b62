//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod file_config_adapter;
pub mod gemini_adapter;
pub mod http;
pub mod log_notifier;
pub mod newsapi_adapter;
pub mod smtp_notifier;
pub mod yahoo_adapter;
