//! Core domain types and logic.

pub mod advice;
pub mod analysis;
pub mod backend_selector;
pub mod config_validation;
pub mod credentials;
pub mod error;
pub mod indicator;
pub mod market;
pub mod ohlcv;
pub mod settings;
pub mod snapshot;
pub mod watchlist;
