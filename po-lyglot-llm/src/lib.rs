//! LLM back-ends for po-lyglot
//!
//! This crate provides [`TranslationOracle`](po_lyglot::TranslationOracle)
//! implementations for hosted and local language models, and the
//! `auto-po-lyglot` command-line tool.
//!
//! # Workflow Example
//!
//! ```ignore
//! use po_lyglot::{RunConfig, translate_catalog};
//! use po_lyglot_llm::{ClientSettings, LlmClientKind, build_oracle};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let oracle = build_oracle(&ClientSettings {
//!         kind: LlmClientKind::Claude,
//!         ..ClientSettings::default()
//!     })?;
//!     let config = RunConfig { target_language: "German".into(), ..RunConfig::default() };
//!     let report = translate_catalog(
//!         Path::new("fr.po"),
//!         Path::new("de.po"),
//!         &config,
//!         oracle.as_ref(),
//!     )
//!     .await?;
//!     println!("{}", report.stats);
//!     Ok(())
//! }
//! ```

pub mod claude;
pub mod client;
pub mod error;
pub mod openai;

// Re-export main types for convenient access
pub use claude::ClaudeClient;
pub use client::{ClientSettings, LlmClientKind, build_oracle};
pub use error::{ClientError, ClientResult};
pub use openai::OpenAiCompatibleClient;
