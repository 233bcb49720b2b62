//! Shared blocking HTTP client construction.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header;

use crate::domain::error::StockSageError;

/// Some quote endpoints reject requests without a browser-like agent.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) stocksage/0.1";

/// Blocking client with a whole-request deadline and JSON accept header.
pub fn build_client(timeout: Duration) -> Result<Client, StockSageError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .build()
        .map_err(|e| StockSageError::Io(std::io::Error::other(e)))
}

/// First `max` characters of a response body, for error messages.
pub fn truncate_body(body: &str, max: usize) -> String {
    match body.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
