//! OpenAI-Compatible Client
//!
//! `LlmClient` implementation against any OpenAI-style chat-completions
//! endpoint. Covers the single non-streaming completion path the pipeline
//! needs; tool calling, streaming, and multimodal content are out of scope.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use super::client::{missing_api_key_error, parse_http_error, LlmClient};
use super::types::{LlmError, LlmResult};

/// Default chat-completions endpoint
const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for an OpenAI-compatible endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiClientConfig {
    /// API key. Compatible local servers may not require one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Base URL override (full chat-completions URL)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model name to use
    pub model: String,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Temperature (0.0 - 1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for OpenAiClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: "gpt-4o-mini".to_string(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// OpenAI-compatible chat client
pub struct OpenAiCompatibleClient {
    config: OpenAiClientConfig,
    client: reqwest::Client,
}

impl OpenAiCompatibleClient {
    /// Create a new client with the given configuration
    pub fn new(config: OpenAiClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent("Copydesk/0.1")
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self { config, client }
    }

    /// Get the API base URL
    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    /// Build the request body for the API
    fn build_request_body(&self, system: &str, user: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[async_trait]
impl LlmClient for OpenAiCompatibleClient {
    fn name(&self) -> &'static str {
        "openai-compatible"
    }

    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> LlmResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| missing_api_key_error(self.name()))?;

        let body = self.build_request_body(system_prompt, user_prompt);
        debug!(model = %self.config.model, "sending chat completion request");

        let response = self
            .client
            .post(self.base_url())
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() || e.is_connect() {
                    LlmError::NetworkError {
                        message: e.to_string(),
                    }
                } else {
                    LlmError::Other {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(parse_http_error(status.as_u16(), &body, self.name()));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| LlmError::ParseError {
            message: format!("invalid chat completion payload: {}", e),
        })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LlmError::ParseError {
                message: "response contained no text content".to_string(),
            })
    }
}
