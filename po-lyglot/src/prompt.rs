//! System and user prompt construction
//!
//! The system prompt states the oracle's role and output contract and is
//! calibrated with worked examples taken from a [`CalibrationSet`]:
//!
//! 1. a basic example showing the bare input/output shape
//! 2. an ambiguous example, with an explanation, chosen by the exact
//!    (original, context) language couple
//! 3. three placeholder examples, one per syntax (`%(name)s`, `{name}`, `%s`)
//! 4. two inline markup examples
//!
//! In large mode a block of supplementary examples is appended, for back-ends
//! that only cache prompts above a minimum size.
//!
//! # Example
//!
//! ```ignore
//! use po_lyglot::{LanguageTriple, PromptBuilder};
//!
//! let builder = PromptBuilder::new(LanguageTriple::new("English", "French", "Italian"))?;
//! let system = builder.build_system_prompt(false)?;
//! let user = builder.build_user_prompt("He gave her a ring.", "Il lui a passé un coup de fil.")?;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::calibration::{CalibrationSet, ExampleKind, LanguageTriple, SelectedExamples};
use crate::error::ConfigError;
use crate::prompts::{
    DEFAULT_SYSTEM_PROMPT, DEFAULT_USER_PROMPT, SUPPLEMENTARY_EXAMPLE_PROMPT, SUPPLEMENTARY_HEADER,
};
use crate::template::{TemplateParams, render};

#[derive(Debug)]
pub struct PromptBuilder {
    languages: LanguageTriple,
    calibration: CalibrationSet,
    system_template: Option<String>,
    user_template: Option<String>,
    /// Set once the first system prompt has been logged at info level
    first_prompt_logged: AtomicBool,
}

impl PromptBuilder {
    /// Create a builder with the built-in examples and templates.
    ///
    /// # Errors
    /// Fails if the built-in examples do not cover the three languages, or if
    /// no ambiguous example exists for the (original, context) couple.
    pub fn new(languages: LanguageTriple) -> Result<Self, ConfigError> {
        Self::with_calibration(languages, CalibrationSet::default())
    }

    pub fn with_calibration(
        languages: LanguageTriple,
        calibration: CalibrationSet,
    ) -> Result<Self, ConfigError> {
        calibration.select(&languages)?;
        Ok(Self {
            languages,
            calibration,
            system_template: None,
            user_template: None,
            first_prompt_logged: AtomicBool::new(false),
        })
    }

    /// Replace the built-in system prompt template. `None` keeps the default.
    pub fn with_system_template(mut self, template: Option<String>) -> Self {
        self.system_template = template;
        self
    }

    /// Replace the built-in user prompt template. `None` keeps the default.
    pub fn with_user_template(mut self, template: Option<String>) -> Self {
        self.user_template = template;
        self
    }

    pub fn languages(&self) -> &LanguageTriple {
        &self.languages
    }

    fn language_params(&self) -> TemplateParams {
        TemplateParams::new()
            .with("original_language", self.languages.original.as_str())
            .with("context_language", self.languages.context.as_str())
            .with("target_language", self.languages.target.as_str())
    }

    fn example_params(&self, selected: &SelectedExamples<'_>) -> Result<TemplateParams, ConfigError> {
        let mut params = TemplateParams::new();

        let (original, context, target) = selected.basic.triple(&self.languages)?;
        params
            .insert("simple_original_phrase", original)
            .insert("simple_context_translation", context)
            .insert("simple_target_translation", target);

        let (original, context, target) = selected.ambiguous.triple(&self.languages)?;
        params
            .insert("ambiguous_original_phrase", original)
            .insert("ambiguous_context_translation", context)
            .insert("ambiguous_target_translation", target);

        for (i, example) in selected.placeholders.iter().enumerate() {
            let (original, context, target) = example.triple(&self.languages)?;
            let n = i + 1;
            params
                .insert(&format!("po_placeholder_original_phrase_{n}"), original)
                .insert(&format!("po_placeholder_context_translation_{n}"), context)
                .insert(&format!("po_placeholder_target_translation_{n}"), target);
        }

        for (i, example) in selected.markup.iter().enumerate() {
            let (original, context, target) = example.triple(&self.languages)?;
            let n = i + 1;
            params
                .insert(&format!("html_original_phrase_{n}"), original)
                .insert(&format!("html_context_translation_{n}"), context)
                .insert(&format!("html_target_translation_{n}"), target);
        }

        Ok(params)
    }

    /// The explanation template is rendered first, with every other key bound
    /// plus `target_translation`.
    fn ambiguous_explanation(
        &self,
        selected: &SelectedExamples<'_>,
        params: &TemplateParams,
    ) -> Result<String, ConfigError> {
        let ExampleKind::Ambiguous { explanation, .. } = &selected.ambiguous.kind else {
            return Err(ConfigError::Invalid(
                "selected ambiguous example has the wrong kind".to_string(),
            ));
        };
        let mut explanation_params = params.clone();
        let target = selected.ambiguous.phrase(&self.languages.target)?;
        explanation_params.insert("target_translation", target);
        render(explanation, &explanation_params)
    }

    fn supplementary_block(&self, selected: &SelectedExamples<'_>) -> Result<String, ConfigError> {
        let mut block = String::from(SUPPLEMENTARY_HEADER);
        for (i, example) in selected.supplementary.iter().enumerate() {
            let (original, context, target) = example.triple(&self.languages)?;
            let params = self
                .language_params()
                .with("original_phrase", original)
                .with("context_translation", context)
                .with("target_translation", target);
            block.push_str(&format!(
                "Example #{}:\n{}\n",
                i + 1,
                render(SUPPLEMENTARY_EXAMPLE_PROMPT, &params)?
            ));
        }
        Ok(block)
    }

    /// Build the system prompt for the configured languages.
    ///
    /// `large_mode` appends the supplementary examples.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when an example is missing for the active
    /// languages or when the template references an unknown key.
    pub fn build_system_prompt(&self, large_mode: bool) -> Result<String, ConfigError> {
        let template = self
            .system_template
            .as_deref()
            .unwrap_or(DEFAULT_SYSTEM_PROMPT);
        debug!("system prompt template:\n{}", template);

        let selected = self.calibration.select(&self.languages)?;
        let mut params = self.language_params();
        params.extend(self.example_params(&selected)?);
        let explanation = self.ambiguous_explanation(&selected, &params)?;
        params.insert("ambiguous_explanation", explanation);

        let mut system_prompt = render(template, &params)?;
        if large_mode {
            system_prompt.push_str(&self.supplementary_block(&selected)?);
        }

        if !self.first_prompt_logged.swap(true, Ordering::Relaxed) {
            info!("First system prompt:\n{}", system_prompt);
        } else {
            debug!("System prompt:\n{}", system_prompt);
        }
        Ok(system_prompt)
    }

    /// Build the user prompt carrying the phrase and its context translation
    pub fn build_user_prompt(
        &self,
        phrase: &str,
        context_translation: &str,
    ) -> Result<String, ConfigError> {
        let template = self.user_template.as_deref().unwrap_or(DEFAULT_USER_PROMPT);
        let params = self
            .language_params()
            .with("original_phrase", phrase)
            .with("context_translation", context_translation);
        render(template, &params)
    }

    /// Whether the first system prompt was already logged
    pub fn first_prompt_logged(&self) -> bool {
        self.first_prompt_logged.load(Ordering::Relaxed)
    }
}
