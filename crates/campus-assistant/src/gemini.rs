//! HTTP backend for the Gemini `generateContent` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::AssistantConfig;
use crate::error::{AssistantError, Result};
use crate::generator::{ChatRequest, TextGenerator};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl<'a> GenerateRequest<'a> {
    fn from_chat(request: &'a ChatRequest) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: &request.system_instruction,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                temperature: request.temperature,
            },
        }
    }
}

/// Concatenated text of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        return Err(AssistantError::EmptyResponse);
    }
    Ok(text)
}

/// Gemini text client.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    api_key_env: String,
}

impl GeminiClient {
    /// Build a client from configuration. A missing API key is not an error
    /// here; every call will fail with [`AssistantError::MissingApiKey`]
    /// instead, which the assistant turns into its fallback text.
    pub fn new(config: &AssistantConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key(),
            api_key_env: config.api_key_env.clone(),
        })
    }

    /// Use an explicit key instead of the environment.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: &ChatRequest) -> Result<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AssistantError::MissingApiKey(self.api_key_env.clone()))?;

        let url = self.endpoint(&request.model);
        debug!(%url, model = %request.model, "sending generateContent request");

        let response = self
            .client
            .post(&url)
            .query(&[("key", key)])
            .json(&GenerateRequest::from_chat(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| AssistantError::Malformed(e.to_string()))?;
        extract_text(parsed)
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("has_api_key", &self.api_key.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat() -> ChatRequest {
        ChatRequest {
            prompt: "Where is the library?".into(),
            system_instruction: "Be brief.".into(),
            temperature: 0.5,
            model: "gemini-1.5-flash".into(),
        }
    }

    #[test]
    fn request_body_shape() {
        let req = chat();
        let body = serde_json::to_value(GenerateRequest::from_chat(&req)).unwrap();
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be brief.");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Where is the library?");
        assert_eq!(body["generationConfig"]["temperature"], 0.5);
    }

    #[test]
    fn extracts_first_candidate_text() {
        let json = r#"{"candidates":[
            {"content":{"parts":[{"text":"North "},{"text":"campus."}]}},
            {"content":{"parts":[{"text":"ignored"}]}}
        ]}"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_text(parsed).unwrap(), "North campus.");
    }

    #[test]
    fn empty_candidates_is_error() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert!(matches!(extract_text(parsed), Err(AssistantError::EmptyResponse)));

        let blocked: GenerateResponse =
            serde_json::from_str(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#).unwrap();
        assert!(matches!(extract_text(blocked), Err(AssistantError::EmptyResponse)));
    }

    #[test]
    fn endpoint_trims_trailing_slash() {
        let config = AssistantConfig {
            base_url: "http://localhost:8080/".into(),
            ..Default::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint("m"),
            "http://localhost:8080/v1beta/models/m:generateContent"
        );
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let config = AssistantConfig {
            api_key_env: "CAMPUS_ASSISTANT_TEST_UNSET_KEY".into(),
            ..Default::default()
        };
        let client = GeminiClient::new(&config).unwrap();
        let err = client.generate(&chat()).await.unwrap_err();
        assert!(matches!(err, AssistantError::MissingApiKey(_)));
    }
}
