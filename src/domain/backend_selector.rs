//! Ranked fallback across text-generation models.
//!
//! The set of deployed model ids and their spare quota changes between
//! accounts and over time, so no single model is hardcoded. Every call lists
//! the enabled models once, ranks them by name tier, and tries them in order
//! until one produces text.

use std::fmt;

use crate::domain::error::{BackendError, SelectorError};
use crate::ports::backend_port::{ModelInfo, TextBackendPort};

/// Priority tier derived from a model id. Lower tiers are tried first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModelTier {
    Gemma = 0,
    Lite = 1,
    Flash = 2,
    LegacyFlash = 3,
    General = 4,
}

impl ModelTier {
    /// Case-insensitive substring heuristics, checked in tier order.
    pub fn of(model_id: &str) -> Self {
        let id = model_id.to_lowercase();
        if id.contains("gemma") {
            ModelTier::Gemma
        } else if id.contains("lite") {
            ModelTier::Lite
        } else if id.contains("flash") && !id.contains("2.0") {
            ModelTier::Flash
        } else if id.contains("flash") {
            ModelTier::LegacyFlash
        } else {
            ModelTier::General
        }
    }

    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for ModelTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ModelTier::Gemma => "gemma",
            ModelTier::Lite => "lite",
            ModelTier::Flash => "flash",
            ModelTier::LegacyFlash => "flash-2.0",
            ModelTier::General => "general",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelCandidate {
    pub id: String,
    pub tier: ModelTier,
    /// Position in the listing response.
    pub listing_index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct SelectorConfig {
    /// Stop after this many attempts; `None` tries every candidate.
    pub max_attempts: Option<usize>,
    /// Candidates whose id contains any of these (case-insensitive) are dropped.
    pub exclude: Vec<String>,
}

/// Text produced by the first candidate that succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub model_id: String,
    pub text: String,
    /// Attempts made, including the successful one.
    pub attempts: usize,
}

/// Keep text-capable models, in listing order.
pub fn text_candidates(models: &[ModelInfo]) -> Vec<ModelCandidate> {
    models
        .iter()
        .enumerate()
        .filter(|(_, m)| m.supports_text())
        .map(|(listing_index, m)| ModelCandidate {
            id: m.id.clone(),
            tier: ModelTier::of(&m.id),
            listing_index,
        })
        .collect()
}

/// Stable sort by tier; ties keep listing order.
pub fn rank(mut candidates: Vec<ModelCandidate>) -> Vec<ModelCandidate> {
    candidates.sort_by_key(|c| c.tier);
    candidates
}

pub struct BackendSelector<'a> {
    backend: &'a dyn TextBackendPort,
    config: SelectorConfig,
}

impl<'a> BackendSelector<'a> {
    pub fn new(backend: &'a dyn TextBackendPort, config: SelectorConfig) -> Self {
        Self { backend, config }
    }

    /// One listing call, filtered to text-capable models not excluded by config.
    pub fn list_candidates(&self) -> Result<Vec<ModelCandidate>, BackendError> {
        let models = self.backend.list_models()?;
        log::debug!(
            "backend lists {} models: {:?}",
            models.len(),
            models.iter().map(|m| m.id.as_str()).collect::<Vec<_>>()
        );

        let excluded: Vec<String> = self.config.exclude.iter().map(|e| e.to_lowercase()).collect();
        let candidates = text_candidates(&models)
            .into_iter()
            .filter(|c| {
                let id = c.id.to_lowercase();
                !excluded.iter().any(|e| !e.is_empty() && id.contains(e.as_str()))
            })
            .collect();
        Ok(candidates)
    }

    pub fn ranked_candidates(&self) -> Result<Vec<ModelCandidate>, BackendError> {
        Ok(rank(self.list_candidates()?))
    }

    /// Try ranked candidates in order and return the first completion.
    pub fn complete(&self, prompt: &str) -> Result<Completion, SelectorError> {
        let candidates = self.ranked_candidates().map_err(SelectorError::Listing)?;
        let limit = self.config.max_attempts.unwrap_or(candidates.len());

        let mut attempts = 0;
        for candidate in candidates.iter().take(limit) {
            attempts += 1;
            log::info!("trying model {} (tier {})", candidate.id, candidate.tier);
            match self.backend.generate(&candidate.id, prompt) {
                Ok(text) => {
                    return Ok(Completion {
                        model_id: candidate.id.clone(),
                        text,
                        attempts,
                    });
                }
                Err(e) => log::warn!("model {} failed: {}", candidate.id, e),
            }
        }

        Err(SelectorError::Exhausted { attempts })
    }
}
