//! Text-generation backend port trait.

use crate::domain::error::BackendError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    TextCompletion,
    Embedding,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: String,
    pub capabilities: Vec<Capability>,
}

impl ModelInfo {
    pub fn supports_text(&self) -> bool {
        self.capabilities.contains(&Capability::TextCompletion)
    }
}

pub trait TextBackendPort {
    /// Every model currently enabled for the caller, in backend order.
    fn list_models(&self) -> Result<Vec<ModelInfo>, BackendError>;

    /// One completion attempt. Implementations bound the call with a timeout.
    fn generate(&self, model_id: &str, prompt: &str) -> Result<String, BackendError>;
}
