use serde::{Deserialize, Serialize};

/// Fixed configuration for the chat assistant. None of this is runtime
/// input from the user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub system_instruction: String,
    /// Shown to the user whenever the service cannot answer.
    pub fallback: String,
    pub timeout_secs: u64,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl AssistantConfig {
    /// Read the API key from the configured environment variable.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".into(),
            model: "gemini-1.5-flash".into(),
            temperature: 0.7,
            system_instruction: "You are the Unistone campus assistant. Answer questions about \
                buildings, courses, events, jobs and campus services briefly and helpfully."
                .into(),
            fallback: "Sorry, I'm having trouble connecting right now. Please try again later."
                .into(),
            timeout_secs: 30,
            api_key_env: "GEMINI_API_KEY".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = AssistantConfig::default();
        assert_eq!(c.model, "gemini-1.5-flash");
        assert_eq!(c.timeout_secs, 30);
        assert!((c.temperature - 0.7).abs() < f32::EPSILON);
        assert_eq!(c.api_key_env, "GEMINI_API_KEY");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let c: AssistantConfig = serde_json::from_str(r#"{"model":"gemini-pro"}"#).unwrap();
        assert_eq!(c.model, "gemini-pro");
        assert_eq!(c.fallback, AssistantConfig::default().fallback);
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let c = AssistantConfig {
            api_key_env: "CAMPUS_ASSISTANT_TEST_BLANK_KEY".into(),
            ..Default::default()
        };
        std::env::set_var(&c.api_key_env, "  ");
        assert!(c.api_key().is_none());
    }
}
