use std::time::Duration;

use async_trait::async_trait;
use docrag_core::error::{DocragError, Result};
use docrag_core::models::ChatMessage;
use docrag_core::ports::{Embedder, Generator};
use serde::{Deserialize, Serialize};

/// Default LM Studio server address.
const DEFAULT_BASE_URL: &str = "http://localhost:1234/v1";

/// LM Studio accepts any api key string.
const DEFAULT_API_KEY: &str = "lm-studio";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

pub const DEFAULT_EMBED_MODEL: &str = "text-embedding-nomic-embed-text-v1.5";
pub const DEFAULT_EMBED_DIM: usize = 768;
pub const DEFAULT_CHAT_MODEL: &str = "qwen/qwen3-vl-4b";

/// Connection settings shared by the LM Studio adapters.
#[derive(Debug, Clone)]
pub struct LmStudioConfig {
    /// Base URL of the OpenAI-compatible API
    pub base_url: String,

    pub api_key: String,

    /// Bound on each request; expiry surfaces as a timeout error
    pub timeout: Duration,
}

impl Default for LmStudioConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LmStudioConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Embedder adapter for the LM Studio `/embeddings` endpoint.
pub struct LmStudioEmbedder {
    config: LmStudioConfig,
    model: String,
    dimensions: usize,
    client: reqwest::Client,
}

impl LmStudioEmbedder {
    /// Create a new LM Studio embedder.
    pub fn new(config: LmStudioConfig, model: impl Into<String>, dimensions: usize) -> Self {
        Self { config, model: model.into(), dimensions, client: reqwest::Client::new() }
    }

    /// Create with the default localhost server and embedding model.
    pub fn localhost() -> Self {
        Self::new(LmStudioConfig::default(), DEFAULT_EMBED_MODEL, DEFAULT_EMBED_DIM)
    }
}

#[async_trait]
impl Embedder for LmStudioEmbedder {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingsRequest {
            model: &self.model,
            input: texts.iter().map(|t| t.to_string()).collect(),
        };

        let response = self
            .client
            .post(format!("{}/embeddings", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| embed_transport_error(e, &self.config))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DocragError::EmbedderUnavailable {
                reason: format!("LM Studio API error ({status}): {body}"),
                remediation: format!(
                    "Check that the embedding model '{}' is loaded at {}",
                    self.model, self.config.base_url
                ),
            });
        }

        let parsed: EmbeddingsResponse =
            response.json().await.map_err(|e| DocragError::EmbedderUnavailable {
                reason: format!("Failed to parse LM Studio embeddings response: {e}"),
                remediation: "Check LM Studio API compatibility".to_string(),
            })?;

        let mut data = parsed.data;
        data.sort_by_key(|item| item.index);
        let vectors: Vec<Vec<f32>> = data.into_iter().map(|item| item.embedding).collect();

        if vectors.len() != texts.len() {
            return Err(DocragError::EmbedderUnavailable {
                reason: format!(
                    "LM Studio returned {} embeddings for {} inputs",
                    vectors.len(),
                    texts.len()
                ),
                remediation: format!(
                    "Check that '{}' is an embedding model, not a chat model",
                    self.model
                ),
            });
        }

        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Generator adapter for the LM Studio `/chat/completions` endpoint.
pub struct LmStudioChat {
    config: LmStudioConfig,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl LmStudioChat {
    /// Create a new LM Studio chat generator.
    pub fn new(config: LmStudioConfig, model: impl Into<String>) -> Self {
        Self {
            config,
            model: model.into(),
            temperature: 0.2,
            max_tokens: 2048,
            client: reqwest::Client::new(),
        }
    }

    /// Create with the default localhost server and chat model.
    pub fn localhost() -> Self {
        Self::new(LmStudioConfig::default(), DEFAULT_CHAT_MODEL)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl Generator for LmStudioChat {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| chat_transport_error(e, &self.config))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DocragError::GeneratorUnavailable {
                reason: format!("LM Studio API error ({status}): {body}"),
                remediation: format!(
                    "Check that the chat model '{}' is loaded at {}",
                    self.model, self.config.base_url
                ),
            });
        }

        let parsed: ChatResponse =
            response.json().await.map_err(|e| DocragError::GeneratorUnavailable {
                reason: format!("Failed to parse LM Studio chat response: {e}"),
                remediation: "Check LM Studio API compatibility".to_string(),
            })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| DocragError::GeneratorUnavailable {
                reason: "LM Studio returned no completion choices".to_string(),
                remediation: "Check the chat model configuration".to_string(),
            })?;

        Ok(content.trim().to_string())
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn embed_transport_error(error: reqwest::Error, config: &LmStudioConfig) -> DocragError {
    if error.is_timeout() {
        return DocragError::EmbeddingTimeout { seconds: config.timeout.as_secs() };
    }
    DocragError::EmbedderUnavailable {
        reason: format!("Failed to reach LM Studio: {error}"),
        remediation: format!(
            "Ensure the LM Studio local server is running at {}",
            config.base_url
        ),
    }
}

fn chat_transport_error(error: reqwest::Error, config: &LmStudioConfig) -> DocragError {
    if error.is_timeout() {
        return DocragError::GenerationTimeout { seconds: config.timeout.as_secs() };
    }
    DocragError::GeneratorUnavailable {
        reason: format!("Failed to reach LM Studio: {error}"),
        remediation: format!(
            "Ensure the LM Studio local server is running at {}",
            config.base_url
        ),
    }
}

/// Request body for the embeddings endpoint.
#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: Vec<String>,
}

/// Response from the embeddings endpoint.
#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

/// Request body for the chat completions endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
}

/// Response from the chat completions endpoint.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_creation() {
        let embedder = LmStudioEmbedder::localhost();
        assert_eq!(embedder.model_name(), DEFAULT_EMBED_MODEL);
        assert_eq!(embedder.dimensions(), DEFAULT_EMBED_DIM);
    }

    #[test]
    fn test_embedder_custom_server() {
        let embedder =
            LmStudioEmbedder::new(LmStudioConfig::new("http://custom:1234/v1"), "test-model", 512);
        assert_eq!(embedder.config.base_url, "http://custom:1234/v1");
        assert_eq!(embedder.model_name(), "test-model");
        assert_eq!(embedder.dimensions(), 512);
    }

    #[test]
    fn test_chat_defaults() {
        let chat = LmStudioChat::localhost();
        assert_eq!(chat.model_name(), DEFAULT_CHAT_MODEL);
        assert_eq!(chat.temperature, 0.2);
        assert_eq!(chat.max_tokens, 2048);
    }

    #[test]
    fn test_embeddings_response_parsing_restores_input_order() {
        let json = r#"{
            "data": [
                {"index": 1, "embedding": [0.4, 0.5]},
                {"index": 0, "embedding": [0.1, 0.2]}
            ]
        }"#;
        let parsed: EmbeddingsResponse = serde_json::from_str(json).unwrap();
        let mut data = parsed.data;
        data.sort_by_key(|item| item.index);
        assert_eq!(data[0].embedding, vec![0.1, 0.2]);
        assert_eq!(data[1].embedding, vec![0.4, 0.5]);
    }

    #[test]
    fn test_chat_response_parsing() {
        let json = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "  an answer  "}}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.choices[0].message.content, "  an answer  ");
    }
}
