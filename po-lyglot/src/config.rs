//! Settings of one translation run

use std::time::Duration;

use crate::calibration::LanguageTriple;
use crate::error::ConfigError;
use crate::language::canonical_language_name;

/// Delay inserted after every oracle call to stay under provider rate limits
pub const DEFAULT_PACING_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub original_language: String,
    pub context_language: String,
    pub target_language: String,
    /// System prompt template replacing the built-in one
    pub system_prompt: Option<String>,
    /// User prompt template replacing the built-in one
    pub user_prompt: Option<String>,
    /// Translate again entries already present in the output catalog
    pub force: bool,
    /// Translate entries flagged fuzzy
    pub fuzzy: bool,
    /// Also write a `.mo` file next to the output
    pub compile: bool,
    pub owner: Option<String>,
    pub owner_mail: Option<String>,
    /// Model name written into the header; the oracle's own model otherwise
    pub model: Option<String>,
    /// Application name for the header banner; the input file stem otherwise
    pub app_name: Option<String>,
    pub pacing_delay: Duration,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            original_language: "English".to_string(),
            context_language: "French".to_string(),
            target_language: "Spanish".to_string(),
            system_prompt: None,
            user_prompt: None,
            force: false,
            fuzzy: false,
            compile: false,
            owner: None,
            owner_mail: None,
            model: None,
            app_name: None,
            pacing_delay: DEFAULT_PACING_DELAY,
        }
    }
}

impl RunConfig {
    /// The three languages under their canonical names. Names that are not
    /// known are passed through as given.
    pub fn languages(&self) -> LanguageTriple {
        let canonical = |language: &str| {
            canonical_language_name(language)
                .map(str::to_string)
                .unwrap_or_else(|_| language.trim().to_string())
        };
        LanguageTriple::new(
            canonical(&self.original_language),
            canonical(&self.context_language),
            canonical(&self.target_language),
        )
    }

    /// Copy with every language spelled as [`canonical_language_name`] spells
    /// it, so `italian` or `it` can be given for `Italian`.
    ///
    /// # Errors
    /// Fails on a language that is not known
    pub fn normalized(&self) -> Result<Self, ConfigError> {
        Ok(Self {
            original_language: canonical_language_name(&self.original_language)?.to_string(),
            context_language: canonical_language_name(&self.context_language)?.to_string(),
            target_language: canonical_language_name(&self.target_language)?.to_string(),
            ..self.clone()
        })
    }

    /// Same settings for another target language
    pub fn for_target(&self, target_language: impl Into<String>) -> Self {
        Self {
            target_language: target_language.into(),
            ..self.clone()
        }
    }

    /// Check what can be checked before touching any catalog
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (role, language) in [
            ("original", &self.original_language),
            ("context", &self.context_language),
            ("target", &self.target_language),
        ] {
            if language.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("{role} language is not set")));
            }
        }
        let target = canonical_language_name(&self.target_language)?;
        if canonical_language_name(&self.original_language).is_ok_and(|original| original == target) {
            return Err(ConfigError::Invalid(format!(
                "target language {} is the original language",
                self.target_language
            )));
        }
        Ok(())
    }
}
