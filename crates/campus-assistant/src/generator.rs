use async_trait::async_trait;

use crate::config::AssistantConfig;
use crate::error::Result;

/// One request to the text service: the user's prompt plus the fixed
/// instruction, temperature and model from configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatRequest {
    pub prompt: String,
    pub system_instruction: String,
    pub temperature: f32,
    pub model: String,
}

impl ChatRequest {
    pub fn new(prompt: impl Into<String>, config: &AssistantConfig) -> Self {
        Self {
            prompt: prompt.into(),
            system_instruction: config.system_instruction.clone(),
            temperature: config.temperature,
            model: config.model.clone(),
        }
    }
}

/// A one-shot request/response text service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, request: &ChatRequest) -> Result<String>;
}
