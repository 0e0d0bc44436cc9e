//! Error types for catalog translation
use std::path::PathBuf;

use thiserror::Error;

/// Problems with prompts, calibration examples or languages.
///
/// These are detected before any oracle call is made whenever possible.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// No ambiguous example exists for this (original, context) couple
    #[error("no ambiguous example for original language {original} and context language {context}")]
    MissingAmbiguousExample { original: String, context: String },
    /// A calibration example has no phrase for an active language
    #[error("{example} example has no phrase for language {language}")]
    MissingExamplePhrase { example: String, language: String },
    /// The calibration set does not hold the expected number of examples of a kind
    #[error("expected {expected} {kind} example(s), found {found}")]
    ExampleCount {
        kind: String,
        expected: usize,
        found: usize,
    },
    /// A template references a key that was not supplied
    #[error("prompt template references unknown key '{0}'")]
    UnknownTemplateKey(String),
    /// A template has an unbalanced brace
    #[error("malformed prompt template at byte {position}: {reason}")]
    MalformedTemplate { position: usize, reason: String },
    /// Language name not present in the lookup table
    #[error("unknown language '{0}'")]
    UnknownLanguage(String),
    /// Any other invalid setting
    #[error("{0}")]
    Invalid(String),
}

/// Failure reported by a translation oracle.
///
/// Transport, HTTP and decoding failures are all folded into this one error,
/// carrying the original message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("translation failed: {0}")]
pub struct TranslationError(pub String);

impl TranslationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Errors reading, parsing or writing gettext catalogs
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },
}

/// Top level error of a translation run
#[derive(Debug, Error)]
pub enum PoLyglotError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Translation(#[from] TranslationError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// The text catalog was saved but compiling it failed
    #[error("saved '{po}' but could not compile it: {source}")]
    Compile {
        po: PathBuf,
        #[source]
        source: CatalogError,
    },
}

pub type Result<T> = std::result::Result<T, PoLyglotError>;
