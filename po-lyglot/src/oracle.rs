//! Translation oracle abstraction
//!
//! An oracle is any back-end that answers a (system prompt, user prompt) pair
//! with raw text: a hosted chat-completion API, a local model server, or the
//! [`MockOracle`](crate::mock::MockOracle) used in tests. The merge engine
//! only talks to this trait.
//!
//! # Example
//!
//! ```ignore
//! use po_lyglot::{MockMode, MockOracle, TranslationOracle};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let oracle = MockOracle::new(MockMode::Echo);
//!     let raw = oracle
//!         .translate("You are a translator.", "English sentence: \"Hello\", French translation: \"Bonjour\"")
//!         .await?;
//!     assert_eq!(raw, "\"Hello\"");
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;

use crate::error::TranslationError;

/// A provider able to translate one phrase per call
///
/// All methods are async to support network-bound back-ends.
#[async_trait]
pub trait TranslationOracle: Send + Sync {
    /// Send both prompts and return the raw response text
    ///
    /// # Errors
    ///
    /// Any transport, HTTP or decoding failure is reported as a
    /// [`TranslationError`] carrying the underlying message. Implementations
    /// do not retry.
    async fn translate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, TranslationError>;

    /// Name of the provider, for logs
    fn provider_name(&self) -> &str;

    /// Model identifier, written into catalog headers
    fn model(&self) -> &str;

    /// Whether the system prompt must carry the supplementary examples.
    ///
    /// Back-ends that cache prompts only above a minimum size return `true`.
    fn requires_large_prompt(&self) -> bool {
        false
    }
}

#[async_trait]
impl<T: TranslationOracle + ?Sized> TranslationOracle for Box<T> {
    async fn translate(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, TranslationError> {
        (**self).translate(system_prompt, user_prompt).await
    }

    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    fn model(&self) -> &str {
        (**self).model()
    }

    fn requires_large_prompt(&self) -> bool {
        (**self).requires_large_prompt()
    }
}
