//! Anthropic Messages API client
//!
//! Two flavours share this type: the plain client, and the cached client which
//! marks the system prompt as an ephemeral cache block. Caching only kicks in
//! above a minimum prompt size, so the cached client asks for the large system
//! prompt with the supplementary examples.
//!
//! # Authentication
//!
//! The API key is read from the `ANTHROPIC_API_KEY` environment variable.

use std::time::Duration;

use async_trait::async_trait;
use po_lyglot::{TranslationError, TranslationOracle};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-3-5-sonnet-20240620";

const MAX_TOKENS: u32 = 1000;
const CACHED_MAX_TOKENS: u32 = 1024;
const PROMPT_CACHING_BETA: &str = "prompt-caching-2024-07-31";

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: SystemPrompt<'a>,
    messages: [UserMessage<'a>; 1],
}

#[derive(Serialize)]
#[serde(untagged)]
enum SystemPrompt<'a> {
    Text(&'a str),
    Blocks([SystemBlock<'a>; 1]),
}

#[derive(Serialize)]
struct SystemBlock<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
    cache_control: CacheControl,
}

#[derive(Serialize)]
struct CacheControl {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct UserMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Clone)]
pub struct ClaudeClient {
    api_key: String,
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
    /// Send the system prompt as a cacheable block
    cached: bool,
}

impl ClaudeClient {
    /// Plain client
    ///
    /// # Errors
    /// Fails if the key is empty or the HTTP client cannot be created
    pub fn new(api_key: String, model: Option<String>, temperature: f32) -> ClientResult<Self> {
        Self::build(api_key, model, temperature, false)
    }

    /// Client using prompt caching
    pub fn cached(api_key: String, model: Option<String>, temperature: f32) -> ClientResult<Self> {
        Self::build(api_key, model, temperature, true)
    }

    /// Client with the key from `ANTHROPIC_API_KEY`
    pub fn from_env(model: Option<String>, temperature: f32, cached: bool) -> ClientResult<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .map_err(|_| ClientError::MissingApiKey("ANTHROPIC_API_KEY"))?;
        Self::build(api_key, model, temperature, cached)
    }

    fn build(
        api_key: String,
        model: Option<String>,
        temperature: f32,
        cached: bool,
    ) -> ClientResult<Self> {
        if api_key.trim().is_empty() {
            return Err(ClientError::EmptyApiKey);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()?;

        Ok(Self {
            api_key,
            client,
            base_url: ANTHROPIC_BASE_URL.to_string(),
            model: model.unwrap_or_else(|| DEFAULT_CLAUDE_MODEL.to_string()),
            temperature,
            cached,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn request_body<'a>(&'a self, system_prompt: &'a str, user_prompt: &'a str) -> MessagesRequest<'a> {
        let (system, max_tokens) = if self.cached {
            (
                SystemPrompt::Blocks([SystemBlock {
                    kind: "text",
                    text: system_prompt,
                    cache_control: CacheControl { kind: "ephemeral" },
                }]),
                CACHED_MAX_TOKENS,
            )
        } else {
            (SystemPrompt::Text(system_prompt), MAX_TOKENS)
        };

        MessagesRequest {
            model: &self.model,
            max_tokens,
            temperature: self.temperature,
            system,
            messages: [UserMessage {
                role: "user",
                content: user_prompt,
            }],
        }
    }

    /// Concatenate the text blocks of a response
    fn extract_text(response: MessagesResponse) -> Result<String, TranslationError> {
        let text: String = response
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();
        if text.is_empty() {
            return Err(TranslationError::new("Invalid API response: no text content"));
        }
        Ok(text)
    }
}

impl std::fmt::Debug for ClaudeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaudeClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("cached", &self.cached)
            .finish()
    }
}

#[async_trait]
impl TranslationOracle for ClaudeClient {
    async fn translate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, TranslationError> {
        let url = format!("{}/messages", self.base_url);
        debug!("POST {} with model {} (cached: {})", url, self.model, self.cached);

        let mut request = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&self.request_body(system_prompt, user_prompt));
        if self.cached {
            request = request.header("anthropic-beta", PROMPT_CACHING_BETA);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TranslationError::new(format!("Claude request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranslationError::new(format!(
                "Claude API error ({}): {}",
                status, error_text
            )));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::new(format!("Failed to parse Claude response: {}", e)))?;
        Self::extract_text(body)
    }

    fn provider_name(&self) -> &str {
        if self.cached { "Claude (cached)" } else { "Claude" }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn requires_large_prompt(&self) -> bool {
        self.cached
    }
}
