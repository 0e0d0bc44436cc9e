//! LLM-assisted translation of gettext catalogs
//!
//! Each untranslated entry of a catalog is sent to a translation oracle
//! together with its translation into a second, "context" language, which
//! disambiguates short or ambiguous source phrases. The system prompt is
//! calibrated with worked examples that teach the oracle to answer with a
//! quoted translation, an optional explanation, and every placeholder and
//! markup tag kept verbatim.
//!
//! # Workflow Example
//!
//! ```ignore
//! use po_lyglot::{MockMode, MockOracle, RunConfig, translate_catalog};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig {
//!         target_language: "Italian".to_string(),
//!         ..RunConfig::default()
//!     };
//!     let oracle = MockOracle::new(MockMode::Echo);
//!     let report = translate_catalog(
//!         Path::new("locale/fr/LC_MESSAGES/django.po"),
//!         Path::new("locale/it/LC_MESSAGES/django.po"),
//!         &config,
//!         &oracle,
//!     )
//!     .await?;
//!     println!("{}", report.stats);
//!     Ok(())
//! }
//! ```

pub mod calibration;
pub mod catalog;
pub mod config;
pub mod error;
pub mod language;
pub mod merge;
pub mod mock;
pub mod oracle;
pub mod output;
pub mod placeholder;
pub mod plural;
pub mod prompt;
pub mod prompts;
pub mod template;

// Re-export main types for convenient access
pub use calibration::{CalibrationSet, Example, ExampleKind, LanguageTriple, PlaceholderSyntax};
pub use catalog::{Catalog, CatalogEntry};
pub use config::{DEFAULT_PACING_DELAY, RunConfig};
pub use error::{CatalogError, ConfigError, PoLyglotError, Result, TranslationError};
pub use language::{canonical_language_name, language_code, language_name};
pub use merge::{CatalogTranslator, RunReport, RunStatistics, default_output_path, translate_catalog};
pub use mock::{MockMode, MockOracle};
pub use oracle::TranslationOracle;
pub use output::{TranslationResult, parse_response};
pub use prompt::PromptBuilder;
