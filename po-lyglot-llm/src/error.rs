/// Errors raised while setting up an LLM client
///
/// Failures of the calls themselves are reported as
/// [`po_lyglot::TranslationError`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Required environment variable is not set
    #[error("{0} environment variable not set")]
    MissingApiKey(&'static str),
    #[error("API key cannot be empty")]
    EmptyApiKey,
    #[error("unknown LLM client '{0}', expected one of: openai, ollama, claude, claude_cached, mock")]
    UnknownClient(String),
    #[error("failed to create HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;
