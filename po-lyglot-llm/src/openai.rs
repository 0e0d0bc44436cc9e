//! OpenAI-compatible chat completion client
//!
//! Serves both the OpenAI API and local Ollama servers, which expose the same
//! `/chat/completions` endpoint.
//!
//! # Authentication
//!
//! The OpenAI constructor loads the API key from the `OPENAI_API_KEY`
//! environment variable. Ollama needs no key; its address is read from
//! `OLLAMA_BASE_URL` (default `http://localhost:11434/v1`).
//!
//! # Example
//!
//! ```ignore
//! use po_lyglot::TranslationOracle;
//! use po_lyglot_llm::OpenAiCompatibleClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OpenAiCompatibleClient::ollama_from_env(None, 0.2)?;
//!     let raw = client.translate("You are a translator.", "Hello").await?;
//!     println!("{}", raw);
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use po_lyglot::{TranslationError, TranslationOracle};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ClientError, ClientResult};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-2024-08-06";
pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.1:8b";

/// Local models can be slow on the first call while they load
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for any server speaking the OpenAI chat completion protocol
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    provider: &'static str,
    /// Bearer token; Ollama runs without one
    api_key: Option<String>,
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl OpenAiCompatibleClient {
    fn build(
        provider: &'static str,
        api_key: Option<String>,
        base_url: String,
        model: String,
        temperature: f32,
    ) -> ClientResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            provider,
            api_key,
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            temperature,
        })
    }

    /// Client for the OpenAI API
    ///
    /// # Errors
    /// Fails if the key is empty or the HTTP client cannot be created
    pub fn openai(api_key: String, model: Option<String>, temperature: f32) -> ClientResult<Self> {
        if api_key.trim().is_empty() {
            return Err(ClientError::EmptyApiKey);
        }
        Self::build(
            "OpenAI",
            Some(api_key),
            OPENAI_BASE_URL.to_string(),
            model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            temperature,
        )
    }

    /// OpenAI client with the key from `OPENAI_API_KEY`
    pub fn openai_from_env(model: Option<String>, temperature: f32) -> ClientResult<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ClientError::MissingApiKey("OPENAI_API_KEY"))?;
        Self::openai(api_key, model, temperature)
    }

    /// Client for an Ollama server
    pub fn ollama(base_url: Option<String>, model: Option<String>, temperature: f32) -> ClientResult<Self> {
        Self::build(
            "Ollama",
            None,
            base_url.unwrap_or_else(|| DEFAULT_OLLAMA_BASE_URL.to_string()),
            model.unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
            temperature,
        )
    }

    /// Ollama client at `OLLAMA_BASE_URL`, if set
    pub fn ollama_from_env(model: Option<String>, temperature: f32) -> ClientResult<Self> {
        Self::ollama(std::env::var("OLLAMA_BASE_URL").ok(), model, temperature)
    }

    /// Point the client at another server, e.g. a proxy or a test double
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn request_body<'a>(&'a self, system_prompt: &'a str, user_prompt: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            temperature: self.temperature,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
        }
    }

    fn extract_content(response: ChatResponse) -> Result<String, TranslationError> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| TranslationError::new("Invalid API response: no message content"))
    }
}

impl std::fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish()
    }
}

#[async_trait]
impl TranslationOracle for OpenAiCompatibleClient {
    async fn translate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, TranslationError> {
        let url = self.endpoint();
        debug!("POST {} with model {}", url, self.model);

        let mut request = self
            .client
            .post(&url)
            .json(&self.request_body(system_prompt, user_prompt));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| TranslationError::new(format!("{} request failed: {}", self.provider, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TranslationError::new(format!(
                "{} API error ({}): {}",
                self.provider, status, error_text
            )));
        }

        let body: ChatResponse = response.json().await.map_err(|e| {
            TranslationError::new(format!("Failed to parse {} response: {}", self.provider, e))
        })?;
        Self::extract_content(body)
    }

    fn provider_name(&self) -> &str {
        self.provider
    }

    fn model(&self) -> &str {
        &self.model
    }
}
