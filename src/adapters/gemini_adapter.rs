//! Generative Language REST API backend.
//!
//! `GET {base}/models` enumerates the models enabled for the key, page by
//! page. `POST {base}/{model}:generateContent` produces text. Both calls send
//! the key in the `x-goog-api-key` header.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::adapters::http::{build_client, truncate_body};
use crate::domain::error::{BackendError, StockSageError};
use crate::ports::backend_port::{Capability, ModelInfo, TextBackendPort};

const API_KEY_HEADER: &str = "x-goog-api-key";
const PAGE_SIZE: &str = "1000";
/// Upper bound on listing pages, in case a server keeps returning tokens.
const MAX_PAGES: usize = 20;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ModelList {
    #[serde(default)]
    models: Vec<WireModel>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireModel {
    name: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

fn capability(method: &str) -> Capability {
    match method {
        "generateContent" => Capability::TextCompletion,
        "embedContent" | "batchEmbedContents" => Capability::Embedding,
        other => Capability::Other(other.to_string()),
    }
}

/// One page of the model listing and the token for the next page, if any.
pub fn parse_model_page(body: &str) -> Result<(Vec<ModelInfo>, Option<String>), BackendError> {
    let list: ModelList = serde_json::from_str(body).map_err(|e| BackendError::Decode {
        reason: e.to_string(),
    })?;
    let models = list
        .models
        .into_iter()
        .map(|m| ModelInfo {
            id: m.name,
            capabilities: m
                .supported_generation_methods
                .iter()
                .map(|s| capability(s))
                .collect(),
        })
        .collect();
    let next = list.next_page_token.filter(|t| !t.is_empty());
    Ok((models, next))
}

/// Concatenated text parts of the first candidate.
pub fn parse_generation(body: &str) -> Result<String, BackendError> {
    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Decode {
            reason: e.to_string(),
        })?;

    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        log::debug!("prompt blocked: {}", reason);
        return Err(BackendError::EmptyResponse);
    }

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(BackendError::EmptyResponse);
    }
    Ok(text.trim().to_string())
}

pub fn status_error(status: StatusCode, body: &str, model: &str) -> BackendError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        BackendError::QuotaExceeded {
            model: model.to_string(),
        }
    } else {
        BackendError::Status {
            status: status.as_u16(),
            body: truncate_body(body, 300),
        }
    }
}

/// Resource path for a model id, accepting ids with or without `models/`.
pub fn model_path(model_id: &str) -> String {
    if model_id.starts_with("models/") {
        model_id.to_string()
    } else {
        format!("models/{}", model_id)
    }
}

pub struct GeminiAdapter {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl GeminiAdapter {
    pub fn new(
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

    fn transport(e: reqwest::Error) -> BackendError {
        BackendError::Transport {
            reason: e.to_string(),
        }
    }
}

impl TextBackendPort for GeminiAdapter {
    fn list_models(&self) -> Result<Vec<ModelInfo>, BackendError> {
        let url = format!("{}/models", self.base_url);
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_PAGES {
            let mut query = vec![("pageSize", PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .client
                .get(&url)
                .header(API_KEY_HEADER, self.api_key.expose_secret())
                .query(&query)
                .send()
                .map_err(Self::transport)?;
            let status = response.status();
            let body = response.text().map_err(Self::transport)?;
            if !status.is_success() {
                return Err(status_error(status, &body, "models"));
            }

            let (page, next) = parse_model_page(&body)?;
            models.extend(page);
            match next {
                Some(token) => page_token = Some(token),
                None => return Ok(models),
            }
        }

        log::warn!("model listing still paginating after {} pages", MAX_PAGES);
        Ok(models)
    }

    fn generate(&self, model_id: &str, prompt: &str) -> Result<String, BackendError> {
        let url = format!("{}/{}:generateContent", self.base_url, model_path(model_id));
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, self.api_key.expose_secret())
            .json(&request)
            .send()
            .map_err(Self::transport)?;
        let status = response.status();
        let body = response.text().map_err(Self::transport)?;
        if !status.is_success() {
            return Err(status_error(status, &body, model_id));
        }

        parse_generation(&body)
    }
}
