use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::AssistantConfig;
use crate::generator::{ChatRequest, TextGenerator};

/// What the user sees after asking the assistant something.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// The model answered.
    Answer(String),
    /// The service failed; this is the configured apology.
    Fallback(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Self::Answer(t) | Self::Fallback(t) => t,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Chat front end over a [`TextGenerator`].
#[derive(Clone)]
pub struct Assistant {
    generator: Arc<dyn TextGenerator>,
    config: AssistantConfig,
}

impl Assistant {
    pub fn new(generator: Arc<dyn TextGenerator>, config: AssistantConfig) -> Self {
        Self { generator, config }
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    /// Ask the assistant. Never fails: any backend error becomes
    /// [`Reply::Fallback`].
    pub async fn reply(&self, prompt: &str) -> Reply {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Reply::Fallback(self.config.fallback.clone());
        }

        let request = ChatRequest::new(prompt, &self.config);
        match self.generator.generate(&request).await {
            Ok(text) => {
                debug!(chars = text.len(), "assistant answered");
                Reply::Answer(text.trim().to_string())
            }
            Err(e) => {
                warn!(error = %e, "assistant request failed; using fallback");
                Reply::Fallback(self.config.fallback.clone())
            }
        }
    }
}

impl std::fmt::Debug for Assistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assistant")
            .field("model", &self.config.model)
            .finish()
    }
}
