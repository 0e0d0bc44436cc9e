//! Oracle selection by client name

use std::fmt;
use std::str::FromStr;

use po_lyglot::{MockMode, MockOracle, TranslationOracle};

use crate::claude::ClaudeClient;
use crate::error::{ClientError, ClientResult};
use crate::openai::OpenAiCompatibleClient;

/// Back-ends selectable with `LLM_CLIENT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmClientKind {
    OpenAi,
    Ollama,
    Claude,
    ClaudeCached,
    /// Offline echo oracle, for trying out the pipeline
    Mock,
}

impl FromStr for LlmClientKind {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            "claude" => Ok(Self::Claude),
            "claude_cached" | "claude-cached" => Ok(Self::ClaudeCached),
            "mock" => Ok(Self::Mock),
            other => Err(ClientError::UnknownClient(other.to_string())),
        }
    }
}

impl fmt::Display for LlmClientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::Claude => "claude",
            Self::ClaudeCached => "claude_cached",
            Self::Mock => "mock",
        };
        f.write_str(name)
    }
}

/// Everything needed to build an oracle
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub kind: LlmClientKind,
    /// Provider default when `None`
    pub model: Option<String>,
    pub temperature: f32,
    pub ollama_base_url: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            kind: LlmClientKind::Ollama,
            model: None,
            temperature: 0.2,
            ollama_base_url: None,
        }
    }
}

/// Build the oracle for `settings`, reading API keys from the environment
///
/// # Errors
/// Fails when a required API key is missing or the HTTP client cannot be
/// created.
pub fn build_oracle(settings: &ClientSettings) -> ClientResult<Box<dyn TranslationOracle>> {
    let model = settings.model.clone();
    let temperature = settings.temperature;
    Ok(match settings.kind {
        LlmClientKind::OpenAi => Box::new(OpenAiCompatibleClient::openai_from_env(model, temperature)?),
        LlmClientKind::Ollama => Box::new(match &settings.ollama_base_url {
            Some(url) => OpenAiCompatibleClient::ollama(Some(url.clone()), model, temperature)?,
            None => OpenAiCompatibleClient::ollama_from_env(model, temperature)?,
        }),
        LlmClientKind::Claude => Box::new(ClaudeClient::from_env(model, temperature, false)?),
        LlmClientKind::ClaudeCached => Box::new(ClaudeClient::from_env(model, temperature, true)?),
        LlmClientKind::Mock => {
            let mock = MockOracle::new(MockMode::Echo);
            Box::new(match model {
                Some(model) => mock.with_model(model),
                None => mock,
            })
        }
    })
}
