//! Mock translation oracle for testing
//!
//! A deterministic, network-free oracle for exercising the merge pipeline.
//! It records every prompt it receives so tests can check what the oracle
//! was actually asked.
//!
//! # Example
//!
//! ```ignore
//! use po_lyglot::{MockMode, MockOracle, TranslationOracle};
//!
//! #[tokio::test]
//! async fn test_translation() {
//!     let mock = MockOracle::new(MockMode::Echo);
//!     let raw = mock.translate("", "English sentence: \"hello\", French translation: \"salut\"").await.unwrap();
//!     assert_eq!(raw, "\"hello\"");
//! }
//! ```

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::TranslationError;
use crate::oracle::TranslationOracle;

/// Response behaviours of [`MockOracle`]
#[derive(Debug, Clone)]
pub enum MockMode {
    /// Answer with the original phrase of the user prompt, quoted:
    /// `English sentence: "hello", ...` → `"hello"`
    Echo,

    /// Original phrase → raw response; unknown phrases are echoed
    Mappings(HashMap<String, String>),

    /// Same raw response for every call
    Reply(String),

    /// Every call fails
    Error(String),
}

/// Mock oracle with call recording
#[derive(Debug)]
pub struct MockOracle {
    mode: MockMode,
    model: String,
    large_prompt: bool,
    /// 1-based call number that fails, whatever the mode
    fail_on_call: Option<usize>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<(String, String)>>,
}

impl MockOracle {
    pub fn new(mode: MockMode) -> Self {
        Self {
            mode,
            model: "mock-model".to_string(),
            large_prompt: false,
            fail_on_call: None,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fail the `n`th call (counting from 1) with a translation error
    pub fn failing_on_call(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Ask for the large system prompt, like caching back-ends do
    pub fn with_large_prompt(mut self, large_prompt: bool) -> Self {
        self.large_prompt = large_prompt;
        self
    }

    /// Number of `translate` calls so far, failed ones included
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// (system prompt, user prompt) pairs in call order
    pub fn prompts(&self) -> Vec<(String, String)> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// User prompts in call order
    pub fn user_prompts(&self) -> Vec<String> {
        self.prompts().into_iter().map(|(_, user)| user).collect()
    }

    fn respond(&self, user_prompt: &str) -> Result<String, TranslationError> {
        let phrase = quoted_phrase(user_prompt);
        match &self.mode {
            MockMode::Echo => Ok(format!("\"{}\"", phrase)),
            MockMode::Mappings(map) => Ok(map
                .get(phrase)
                .cloned()
                .unwrap_or_else(|| format!("\"{}\"", phrase))),
            MockMode::Reply(reply) => Ok(reply.clone()),
            MockMode::Error(msg) => Err(TranslationError::new(msg.clone())),
        }
    }
}

/// The original phrase of a user prompt: the text between the first double
/// quote and the last `", ` separator. Falls back to the whole prompt.
fn quoted_phrase(user_prompt: &str) -> &str {
    user_prompt
        .split_once('"')
        .and_then(|(_, rest)| rest.rfind("\", ").map(|end| &rest[..end]))
        .unwrap_or(user_prompt)
}

#[async_trait]
impl TranslationOracle for MockOracle {
    async fn translate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, TranslationError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((system_prompt.to_string(), user_prompt.to_string()));

        if self.fail_on_call == Some(call) {
            return Err(TranslationError::new(format!("mock failure on call {call}")));
        }
        self.respond(user_prompt)
    }

    fn provider_name(&self) -> &str {
        "Mock Oracle"
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn requires_large_prompt(&self) -> bool {
        self.large_prompt
    }
}
