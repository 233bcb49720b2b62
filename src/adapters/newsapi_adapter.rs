//! NewsAPI headline adapter.

use std::time::Duration;

use reqwest::blocking::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::adapters::http::{build_client, truncate_body};
use crate::domain::error::StockSageError;
use crate::ports::news_port::{Headline, NewsPort};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org";

#[derive(Debug, Deserialize)]
struct EverythingResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<Article>,
}

#[derive(Debug, Deserialize)]
struct Article {
    title: Option<String>,
    description: Option<String>,
}

/// Decode an `/v2/everything` body into at most `limit` headlines.
pub fn parse_articles(body: &str, limit: usize) -> Result<Vec<Headline>, StockSageError> {
    let response: EverythingResponse =
        serde_json::from_str(body).map_err(|e| StockSageError::News {
            reason: format!("malformed response: {}", e),
        })?;

    if response.status != "ok" {
        return Err(StockSageError::News {
            reason: response
                .message
                .unwrap_or_else(|| format!("status {}", response.status)),
        });
    }

    Ok(response
        .articles
        .into_iter()
        .filter_map(|a| {
            let title = a.title?.trim().to_string();
            if title.is_empty() {
                return None;
            }
            Some(Headline {
                title,
                description: a.description.unwrap_or_default().trim().to_string(),
            })
        })
        .take(limit)
        .collect())
}

pub struct NewsApiAdapter {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl NewsApiAdapter {
    pub fn new(api_key: SecretString, timeout: Duration) -> Result<Self, StockSageError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key, timeout)
    }

    pub fn with_base_url(
        base_url: &str,
        api_key: SecretString,
        timeout: Duration,
    ) -> Result<Self, StockSageError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }
}

impl NewsPort for NewsApiAdapter {
    fn fetch_headlines(
        &self,
        company_name: &str,
        limit: usize,
    ) -> Result<Vec<Headline>, StockSageError> {
        let page_size = limit.to_string();
        let response = self
            .client
            .get(format!("{}/v2/everything", self.base_url))
            .header("X-Api-Key", self.api_key.expose_secret())
            .query(&[
                ("q", company_name),
                ("sortBy", "publishedAt"),
                ("language", "en"),
                ("pageSize", page_size.as_str()),
            ])
            .send()
            .map_err(|e| StockSageError::News {
                reason: format!("request failed: {}", e),
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| StockSageError::News {
            reason: format!("could not read response: {}", e),
        })?;
        if !status.is_success() {
            return Err(StockSageError::News {
                reason: format!("HTTP {}: {}", status.as_u16(), truncate_body(&body, 200)),
            });
        }

        parse_articles(&body, limit)
    }
}
