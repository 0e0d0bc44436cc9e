//! Catalog merge engine
//!
//! Walks a source catalog entry by entry and decides, for each one, whether to
//! ask the oracle, reuse the translation already present in the output
//! catalog, or skip it. The output catalog is written once at the end of the
//! run, also when the oracle failed halfway, so that earlier translations are
//! never lost.
//!
//! # Example
//!
//! ```ignore
//! use po_lyglot::{MockMode, MockOracle, RunConfig, translate_catalog};
//!
//! let config = RunConfig { target_language: "Italian".into(), ..RunConfig::default() };
//! let oracle = MockOracle::new(MockMode::Echo);
//! let report = translate_catalog("fr.po".as_ref(), "it.po".as_ref(), &config, &oracle).await?;
//! println!("{}", report.stats);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use time::OffsetDateTime;
use tracing::{error, info, warn};

use crate::catalog::{Catalog, CatalogEntry};
use crate::config::RunConfig;
use crate::error::{ConfigError, PoLyglotError, Result, TranslationError};
use crate::language::language_code;
use crate::oracle::TranslationOracle;
use crate::output::{TranslationResult, parse_response};
use crate::placeholder::missing_placeholders;
use crate::plural::{nplurals, plural_forms, plural_slot_count};
use crate::prompt::PromptBuilder;

const TOOL_NAME: &str = "auto-po-lyglot";

/// Counters of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStatistics {
    /// Live entries of the catalog, header excluded
    pub total: usize,
    /// Entries sent to the oracle in this run
    pub translated: usize,
    /// Entries reused from the existing output catalog
    pub already_translated: usize,
    /// Translated entries that had a reusable translation
    pub forced: usize,
    /// Fuzzy entries left alone
    pub fuzzy_skipped: usize,
    pub percent_translated: f64,
}

impl RunStatistics {
    /// `translated / (total - already_translated) * 100`, rounded to two
    /// decimals. 100 when every entry was reused.
    pub fn percent(translated: usize, total: usize, already_translated: usize) -> f64 {
        let remaining = total.saturating_sub(already_translated);
        if remaining == 0 {
            return 100.0;
        }
        (translated as f64 / remaining as f64 * 10_000.0).round() / 100.0
    }

    fn finish(&mut self) {
        self.percent_translated = Self::percent(self.translated, self.total, self.already_translated);
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translated {} of {} entries ({:.2}%), {} already translated, {} forced, {} fuzzy skipped",
            self.translated,
            self.total,
            self.percent_translated,
            self.already_translated,
            self.forced,
            self.fuzzy_skipped
        )
    }
}

/// Outcome of a run whose output catalog could be saved
#[derive(Debug)]
pub struct RunReport {
    pub stats: RunStatistics,
    pub output: PathBuf,
    /// Compiled catalog, when compilation was requested
    pub compiled: Option<PathBuf>,
    /// Oracle error that stopped the run early
    pub failure: Option<TranslationError>,
}

impl RunReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Translates catalogs into one target language with one oracle
pub struct CatalogTranslator<'a> {
    config: &'a RunConfig,
    oracle: &'a dyn TranslationOracle,
    prompts: PromptBuilder,
}

impl<'a> CatalogTranslator<'a> {
    /// # Errors
    /// Fails on invalid languages, missing calibration examples or broken
    /// prompt templates, before any oracle call.
    pub fn new(config: &'a RunConfig, oracle: &'a dyn TranslationOracle) -> Result<Self> {
        config.validate()?;
        let prompts = PromptBuilder::new(config.languages())?
            .with_system_template(config.system_prompt.clone())
            .with_user_template(config.user_prompt.clone());

        prompts.build_system_prompt(oracle.requires_large_prompt())?;
        prompts.build_user_prompt("", "")?;

        Ok(Self {
            config,
            oracle,
            prompts,
        })
    }

    /// Model name written into the header
    pub fn model(&self) -> &str {
        self.config.model.as_deref().unwrap_or(self.oracle.model())
    }

    /// Translate one phrase through the prompt, oracle and parser pipeline.
    ///
    /// The pacing delay is awaited after the oracle call, whether it
    /// succeeded or not.
    pub async fn translate_phrase(
        &self,
        phrase: &str,
        context_translation: &str,
    ) -> Result<TranslationResult> {
        let system_prompt = self
            .prompts
            .build_system_prompt(self.oracle.requires_large_prompt())?;
        let user_prompt = self.prompts.build_user_prompt(phrase, context_translation)?;

        let raw = self.oracle.translate(&system_prompt, &user_prompt).await;
        tokio::time::sleep(self.config.pacing_delay).await;
        let result = parse_response(&raw?);

        let missing = missing_placeholders(phrase, &result.translation);
        if !missing.is_empty() {
            warn!(
                "{} translation of \"{}\" lost placeholders {:?}: \"{}\"",
                self.config.target_language, phrase, missing, result.translation
            );
        }
        Ok(result)
    }

    /// Translate `input` into `output`.
    ///
    /// When `output` already exists, its translations are reused unless
    /// `force` is set. An oracle failure stops the loop; the catalog is saved
    /// anyway and the failure is returned in the report.
    pub async fn translate_file(&self, input: &Path, output: &Path) -> Result<RunReport> {
        info!(
            "Translating {} to {} in {}",
            input.display(),
            self.config.target_language,
            output.display()
        );
        let mut catalog = Catalog::load(input)?;
        let prior = if output.exists() {
            Some(Catalog::load(output)?)
        } else {
            None
        };

        self.rewrite_header(&mut catalog, input)?;

        let mut stats = RunStatistics {
            total: catalog.len(),
            ..RunStatistics::default()
        };
        let outcome = self
            .translate_entries(&mut catalog, prior.as_ref(), &mut stats)
            .await;
        stats.finish();

        catalog.save(output)?;
        let failure = match outcome {
            Ok(()) => None,
            Err(PoLyglotError::Translation(e)) => {
                error!("Translation stopped: {}", e);
                Some(e)
            }
            Err(other) => return Err(other),
        };
        info!("Saved {}, {}", output.display(), stats);

        let compiled = if self.config.compile {
            let mo_path = output.with_extension("mo");
            info!("Compiling {}", mo_path.display());
            catalog
                .save_as_mo(&mo_path)
                .map_err(|source| PoLyglotError::Compile {
                    po: output.to_path_buf(),
                    source,
                })?;
            Some(mo_path)
        } else {
            None
        };

        Ok(RunReport {
            stats,
            output: output.to_path_buf(),
            compiled,
            failure,
        })
    }

    async fn translate_entries(
        &self,
        catalog: &mut Catalog,
        prior: Option<&Catalog>,
        stats: &mut RunStatistics,
    ) -> Result<()> {
        let mut reusable: HashMap<(Option<&str>, &str), &CatalogEntry> = HashMap::new();
        for entry in prior.map(Catalog::entries).unwrap_or_default() {
            if !entry.obsolete && entry.is_translated() {
                reusable
                    .entry((entry.msgctxt.as_deref(), entry.msgid.as_str()))
                    .or_insert(entry);
            }
        }

        for entry in catalog.entries_mut() {
            if entry.obsolete || entry.msgid.is_empty() {
                continue;
            }
            let previous = reusable
                .get(&(entry.msgctxt.as_deref(), entry.msgid.as_str()))
                .copied();

            if entry.is_fuzzy() && !self.config.fuzzy {
                // Keep what an earlier fuzzy-enabled run produced
                if let Some(previous) = previous {
                    entry.copy_translation_from(previous);
                    entry.comment = previous.comment.clone().or(entry.comment.take());
                }
                stats.fuzzy_skipped += 1;
                continue;
            }
            if let Some(previous) = previous {
                if !self.config.force {
                    entry.copy_translation_from(previous);
                    if previous.comment.is_some() {
                        entry.comment = previous.comment.clone();
                    }
                    stats.already_translated += 1;
                    continue;
                }
            }

            self.translate_entry(entry).await?;
            stats.translated += 1;
            if previous.is_some() {
                stats.forced += 1;
            }
        }
        Ok(())
    }

    /// Fill the translation slots of `entry`. The entry is left untouched when
    /// any oracle call fails.
    async fn translate_entry(&self, entry: &mut CatalogEntry) -> Result<()> {
        match entry.msgid_plural.clone() {
            Some(msgid_plural) => self.translate_plural(entry, &msgid_plural).await,
            None => self.translate_singular(entry).await,
        }
    }

    async fn translate_singular(&self, entry: &mut CatalogEntry) -> Result<()> {
        let context = if entry.msgstr.is_empty() {
            entry.msgid.as_str()
        } else {
            entry.msgstr.as_str()
        };
        let result = self.translate_phrase(&entry.msgid, context).await?;
        self.log_translation(&entry.msgid, context, &result);

        entry.msgstr = result.translation;
        if result.explanation.is_some() {
            entry.comment = result.explanation;
        }
        Ok(())
    }

    /// Slot 0 comes from `msgid`, every other slot from `msgid_plural`.
    ///
    /// The slot count follows the target language's plural rules; the input
    /// slots only provide context. A slot the oracle leaves empty falls back
    /// to its context phrase.
    async fn translate_plural(&self, entry: &mut CatalogEntry, msgid_plural: &str) -> Result<()> {
        let slots = plural_slot_count(&self.config.target_language);

        let mut translations = Vec::with_capacity(slots);
        let mut explanations = Vec::new();
        for slot in 0..slots {
            let source = if slot == 0 {
                entry.msgid.as_str()
            } else {
                msgid_plural
            };
            let context = entry
                .msgstr_plural
                .get(slot)
                .map(String::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or(source);
            let result = self.translate_phrase(source, context).await?;
            self.log_translation(source, context, &result);
            if result.translation.is_empty() {
                warn!(
                    "Empty {} translation for plural slot {} of \"{}\", keeping \"{}\"",
                    self.config.target_language, slot, entry.msgid, context
                );
                translations.push(context.to_string());
            } else {
                translations.push(result.translation);
            }
            explanations.extend(result.explanation);
        }

        entry.msgstr_plural = translations;
        if !explanations.is_empty() {
            entry.comment = Some(explanations.join("\n"));
        }
        Ok(())
    }

    fn log_translation(&self, original: &str, context: &str, result: &TranslationResult) {
        info!(
            "==================\n  {}: \"{}\"\n  {}: \"{}\"\n  {}: \"{}\"\n  Comment: {}",
            self.config.original_language,
            original,
            self.config.context_language,
            context,
            self.config.target_language,
            result.translation,
            result.explanation.as_deref().unwrap_or("")
        );
    }

    fn rewrite_header(&self, catalog: &mut Catalog, input: &Path) -> Result<()> {
        let now = OffsetDateTime::now_utc();
        let code = language_code(&self.config.target_language)?;
        let app_name = match &self.config.app_name {
            Some(name) => name.clone(),
            None => input
                .file_stem()
                .and_then(|stem| stem.to_str())
                .map(str::to_string)
                .ok_or_else(|| {
                    ConfigError::Invalid(format!("cannot derive an application name from {}", input.display()))
                })?,
        };

        catalog.set_header_comment(header_banner(
            self.config,
            &app_name,
            self.model(),
            input,
            now.year(),
        ));
        catalog.set_metadata(
            "Last-Translator",
            format!("{} using {}", TOOL_NAME, self.model()),
        );
        catalog.set_metadata("Language", code);
        catalog.set_metadata("PO-Revision-Date", revision_date(now));

        let slots = plural_slot_count(&self.config.target_language);
        match plural_forms(&self.config.target_language) {
            Some(forms) => catalog.set_metadata("Plural-Forms", forms),
            None => {
                let declared = catalog
                    .metadata("Plural-Forms")
                    .and_then(nplurals)
                    .filter(|n| *n != slots);
                if let Some(declared) = declared {
                    warn!(
                        "Plural-Forms of {} declares {} forms, {} plural entries get {}",
                        input.display(),
                        declared,
                        self.config.target_language,
                        slots
                    );
                }
            }
        }
        Ok(())
    }
}

fn header_banner(config: &RunConfig, app_name: &str, model: &str, input: &Path, year: i32) -> String {
    let mut lines = vec![format!(
        "{} translations for the {} application.",
        config.target_language, app_name
    )];
    if let Some(owner) = &config.owner {
        lines.push(format!("Copyright (C) {} {}", year, owner));
    }
    lines.push("This file is distributed under the same license as the application.".to_string());
    lines.push(format!(
        "It was generated from {} by {} using the {} model.",
        input.display(),
        TOOL_NAME,
        model
    ));
    lines.push(
        "Machine translations may contain errors and should be reviewed by a human translator."
            .to_string(),
    );
    lines.push("Explanations given by the model are kept as extracted comments.".to_string());
    if let Some(owner) = &config.owner {
        match &config.owner_mail {
            Some(mail) => lines.push(format!("{} <{}>, {}.", owner, mail, year)),
            None => lines.push(format!("{}, {}.", owner, year)),
        }
    }
    lines.join("\n")
}

/// `YYYY-MM-DD HH:MM+0000`
fn revision_date(now: OffsetDateTime) -> String {
    let now = now.to_offset(time::UtcOffset::UTC);
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}+0000",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute()
    )
}

/// Default output path: `<stem>.<code>.po` next to the input
pub fn default_output_path(input: &Path, target_language: &str) -> std::result::Result<PathBuf, ConfigError> {
    let code = language_code(target_language)?;
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| ConfigError::Invalid(format!("invalid input file name {}", input.display())))?;
    Ok(input.with_file_name(format!("{stem}.{code}.po")))
}

/// Translate `input` into `output` with the given settings and oracle
pub async fn translate_catalog(
    input: &Path,
    output: &Path,
    config: &RunConfig,
    oracle: &dyn TranslationOracle,
) -> Result<RunReport> {
    CatalogTranslator::new(config, oracle)?
        .translate_file(input, output)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockMode, MockOracle};
    use std::time::Duration;
    use tempfile::TempDir;

    const HEADER: &str = r#"# Demo catalog
msgid ""
msgstr ""
"Project-Id-Version: demo 1.0\n"
"Language: fr\n"
"Plural-Forms: nplurals=2; plural=(n > 1);\n"
"#;

    fn config() -> RunConfig {
        RunConfig {
            target_language: "Italian".to_string(),
            pacing_delay: Duration::ZERO,
            ..RunConfig::default()
        }
    }

    fn entries_po(entries: &[(&str, &str)]) -> String {
        let mut po = HEADER.to_string();
        for (msgid, msgstr) in entries {
            po.push_str(&format!("\nmsgid \"{msgid}\"\nmsgstr \"{msgstr}\"\n"));
        }
        po
    }

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    fn mappings(pairs: &[(&str, &str)]) -> MockMode {
        MockMode::Mappings(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    const THREE: &[(&str, &str)] = &[
        ("Hello", "Bonjour"),
        ("Save", "Enregistrer"),
        ("Quit", "Quitter"),
    ];

    #[test]
    fn test_percent_arithmetic() {
        assert_eq!(RunStatistics::percent(6, 10, 4), 100.0);
        assert_eq!(RunStatistics::percent(3, 10, 0), 30.0);
        assert_eq!(RunStatistics::percent(1, 3, 0), 33.33);
        assert_eq!(RunStatistics::percent(0, 4, 4), 100.0);
        assert_eq!(RunStatistics::percent(0, 0, 0), 100.0);
    }

    #[test]
    fn test_revision_date_format() {
        let now = OffsetDateTime::from_unix_timestamp(1_723_061_340).unwrap();
        assert_eq!(revision_date(now), "2024-08-07 20:09+0000");
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("/tmp/locale/django.po"), "Italian").unwrap(),
            PathBuf::from("/tmp/locale/django.it.po")
        );
        assert!(default_output_path(Path::new("django.po"), "Klingon").is_err());
    }

    #[tokio::test]
    async fn test_translates_with_context() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "fr.po", &entries_po(&[("Hello", "Bonjour"), ("Untranslated", "")]));
        let output = dir.path().join("it.po");
        let oracle = MockOracle::new(mappings(&[("Hello", "\"Ciao\"")]));

        let report = translate_catalog(&input, &output, &config(), &oracle).await.unwrap();
        assert!(report.is_complete());
        assert_eq!(report.stats.translated, 2);
        assert_eq!(report.stats.total, 2);
        assert_eq!(report.stats.percent_translated, 100.0);

        let prompts = oracle.user_prompts();
        assert_eq!(
            prompts[0],
            "English sentence: \"Hello\", French translation: \"Bonjour\""
        );
        // no context translation: the identifier stands in
        assert_eq!(
            prompts[1],
            "English sentence: \"Untranslated\", French translation: \"Untranslated\""
        );

        let saved = Catalog::load(&output).unwrap();
        assert_eq!(saved.find(None, "Hello").unwrap().msgstr, "Ciao");
        assert_eq!(saved.find(None, "Untranslated").unwrap().msgstr, "Untranslated");
    }

    #[tokio::test]
    async fn test_second_run_reuses_everything() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "fr.po", &entries_po(THREE));
        let output = dir.path().join("it.po");

        let first = MockOracle::new(mappings(&[("Save", "\"Salva\"\nImperative form")]));
        translate_catalog(&input, &output, &config(), &first).await.unwrap();
        let after_first = Catalog::load(&output).unwrap();

        let second = MockOracle::new(MockMode::Echo);
        let report = translate_catalog(&input, &output, &config(), &second).await.unwrap();
        assert_eq!(second.calls(), 0);
        assert_eq!(report.stats.translated, 0);
        assert_eq!(report.stats.already_translated, 3);
        assert_eq!(report.stats.percent_translated, 100.0);

        let after_second = Catalog::load(&output).unwrap();
        assert_eq!(after_second.entries(), after_first.entries());
        assert_eq!(
            after_second.find(None, "Save").unwrap().comment.as_deref(),
            Some("Imperative form")
        );
    }

    #[tokio::test]
    async fn test_force_retranslates() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "fr.po", &entries_po(THREE));
        let output = dir.path().join("it.po");
        translate_catalog(&input, &output, &config(), &MockOracle::new(MockMode::Echo))
            .await
            .unwrap();

        let forced = RunConfig {
            force: true,
            ..config()
        };
        let oracle = MockOracle::new(MockMode::Reply("\"Nuovo\"".to_string()));
        let report = translate_catalog(&input, &output, &forced, &oracle).await.unwrap();
        assert_eq!(oracle.calls(), 3);
        assert_eq!(report.stats.translated, 3);
        assert_eq!(report.stats.forced, 3);
        assert_eq!(report.stats.already_translated, 0);
        let saved = Catalog::load(&output).unwrap();
        assert!(saved.entries().iter().all(|e| e.msgstr == "Nuovo"));
    }

    #[tokio::test]
    async fn test_fuzzy_entries_are_gated() {
        let dir = TempDir::new().unwrap();
        let po = format!(
            "{HEADER}\nmsgid \"Hello\"\nmsgstr \"Bonjour\"\n\n#, fuzzy\nmsgid \"Maybe\"\nmsgstr \"Peut-être\"\n"
        );
        let input = write(&dir, "fr.po", &po);

        let output = dir.path().join("skip.po");
        let oracle = MockOracle::new(MockMode::Echo);
        let report = translate_catalog(&input, &output, &config(), &oracle).await.unwrap();
        assert_eq!(oracle.calls(), 1);
        assert_eq!(report.stats.fuzzy_skipped, 1);
        assert_eq!(report.stats.percent_translated, 50.0);
        let saved = Catalog::load(&output).unwrap();
        assert_eq!(saved.find(None, "Maybe").unwrap().msgstr, "Peut-être");

        let output = dir.path().join("fuzzy.po");
        let with_fuzzy = RunConfig {
            fuzzy: true,
            ..config()
        };
        let oracle = MockOracle::new(MockMode::Echo);
        let report = translate_catalog(&input, &output, &with_fuzzy, &oracle).await.unwrap();
        assert_eq!(oracle.calls(), 2);
        assert_eq!(report.stats.fuzzy_skipped, 0);
        let saved = Catalog::load(&output).unwrap();
        assert_eq!(saved.find(None, "Maybe").unwrap().msgstr, "Maybe");
    }

    #[tokio::test]
    async fn test_fuzzy_translation_survives_a_run_without_fuzzy() {
        let dir = TempDir::new().unwrap();
        let po = format!(
            "{HEADER}\nmsgid \"Hello\"\nmsgstr \"Bonjour\"\n\n#, fuzzy\nmsgid \"Maybe\"\nmsgstr \"Peut-être\"\n"
        );
        let input = write(&dir, "fr.po", &po);
        let output = dir.path().join("it.po");
        let oracle = MockOracle::new(mappings(&[
            ("Hello", "\"Ciao\""),
            ("Maybe", "\"Forse\"\nAdverb"),
        ]));
        let with_fuzzy = RunConfig {
            fuzzy: true,
            ..config()
        };
        translate_catalog(&input, &output, &with_fuzzy, &oracle).await.unwrap();

        let oracle = MockOracle::new(MockMode::Echo);
        let report = translate_catalog(&input, &output, &config(), &oracle).await.unwrap();
        assert_eq!(oracle.calls(), 0);
        assert_eq!(report.stats.fuzzy_skipped, 1);
        let saved = Catalog::load(&output).unwrap();
        let maybe = saved.find(None, "Maybe").unwrap();
        assert_eq!(maybe.msgstr, "Forse");
        assert_eq!(maybe.comment.as_deref(), Some("Adverb"));
        assert!(maybe.is_fuzzy());
    }

    #[tokio::test]
    async fn test_placeholders_reach_the_oracle_verbatim() {
        let dir = TempDir::new().unwrap();
        let input = write(
            &dir,
            "fr.po",
            &entries_po(&[("%(name)s logged in", "%(name)s s'est connecté")]),
        );
        let output = dir.path().join("it.po");
        let oracle = MockOracle::new(MockMode::Echo);
        translate_catalog(&input, &output, &config(), &oracle).await.unwrap();

        assert!(oracle.user_prompts()[0].contains("\"%(name)s logged in\""));
        let saved = Catalog::load(&output).unwrap();
        assert!(
            saved
                .find(None, "%(name)s logged in")
                .unwrap()
                .msgstr
                .contains("%(name)s")
        );
    }

    #[tokio::test]
    async fn test_statistics_with_partial_reuse() {
        let dir = TempDir::new().unwrap();
        let all: Vec<(String, String)> = (1..=10)
            .map(|i| (format!("Message {i}"), format!("Message FR {i}")))
            .collect();
        let borrowed: Vec<(&str, &str)> = all.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        let input = write(&dir, "fr.po", &entries_po(&borrowed));

        let prior: Vec<(&str, &str)> = borrowed[..4].iter().map(|(id, _)| (*id, "Già fatto")).collect();
        let output = write(&dir, "it.po", &entries_po(&prior));

        let oracle = MockOracle::new(MockMode::Echo);
        let report = translate_catalog(&input, &output, &config(), &oracle).await.unwrap();
        assert_eq!(oracle.calls(), 6);
        assert_eq!(report.stats.total, 10);
        assert_eq!(report.stats.already_translated, 4);
        assert_eq!(report.stats.translated, 6);
        assert_eq!(report.stats.percent_translated, 100.0);
    }

    #[tokio::test]
    async fn test_statistics_without_reuse() {
        let dir = TempDir::new().unwrap();
        let po = (1..=10)
            .map(|i| {
                let fuzzy = if i > 3 { "#, fuzzy\n" } else { "" };
                format!("\n{fuzzy}msgid \"Message {i}\"\nmsgstr \"\"\n")
            })
            .collect::<String>();
        let input = write(&dir, "fr.po", &format!("{HEADER}{po}"));
        let output = dir.path().join("it.po");

        let report = translate_catalog(&input, &output, &config(), &MockOracle::new(MockMode::Echo))
            .await
            .unwrap();
        assert_eq!(report.stats.translated, 3);
        assert_eq!(report.stats.fuzzy_skipped, 7);
        assert_eq!(report.stats.percent_translated, 30.0);
    }

    #[tokio::test]
    async fn test_failure_keeps_earlier_translations() {
        let dir = TempDir::new().unwrap();
        let source = [
            ("One", "Un"),
            ("Two", "Deux"),
            ("Three", "Trois"),
            ("Four", "Quatre"),
            ("Five", "Cinq"),
        ];
        let input = write(&dir, "fr.po", &entries_po(&source));
        let output = dir.path().join("it.po");
        let oracle = MockOracle::new(MockMode::Echo).failing_on_call(3);

        let report = translate_catalog(&input, &output, &config(), &oracle).await.unwrap();
        assert!(!report.is_complete());
        assert_eq!(oracle.calls(), 3);
        assert_eq!(report.stats.translated, 2);
        assert_eq!(report.stats.percent_translated, 40.0);

        let saved = Catalog::load(&output).unwrap();
        let msgstrs: Vec<&str> = saved.entries().iter().map(|e| e.msgstr.as_str()).collect();
        assert_eq!(msgstrs, vec!["One", "Two", "Trois", "Quatre", "Cinq"]);
    }

    #[tokio::test]
    async fn test_plural_slots_are_translated() {
        let dir = TempDir::new().unwrap();
        let po = format!(
            "{HEADER}\nmsgid \"%d file\"\nmsgid_plural \"%d files\"\nmsgstr[0] \"%d fichier\"\nmsgstr[1] \"\"\n"
        );
        let input = write(&dir, "fr.po", &po);
        let output = dir.path().join("it.po");
        let oracle = MockOracle::new(mappings(&[
            ("%d file", "\"%d file\"\nSingular"),
            ("%d files", "\"%d file\"\nPlural, the noun is invariable"),
        ]));

        let report = translate_catalog(&input, &output, &config(), &oracle).await.unwrap();
        assert_eq!(report.stats.translated, 1);
        let prompts = oracle.user_prompts();
        assert_eq!(prompts.len(), 2);
        assert!(prompts[0].contains("French translation: \"%d fichier\""));
        assert!(prompts[1].contains("French translation: \"%d files\""));

        let saved = Catalog::load(&output).unwrap();
        let entry = saved.find(None, "%d file").unwrap();
        assert_eq!(entry.msgid_plural.as_deref(), Some("%d files"));
        assert_eq!(entry.msgstr_plural, vec!["%d file", "%d file"]);
        assert_eq!(
            entry.comment.as_deref(),
            Some("Singular\nPlural, the noun is invariable")
        );
    }

    #[tokio::test]
    async fn test_plural_reuse_copies_every_slot() {
        let dir = TempDir::new().unwrap();
        let plural = "\nmsgid \"%d file\"\nmsgid_plural \"%d files\"\nmsgstr[0] \"{0}\"\nmsgstr[1] \"{1}\"\n";
        let input = write(
            &dir,
            "fr.po",
            &format!("{HEADER}{}", plural.replace("{0}", "%d fichier").replace("{1}", "%d fichiers")),
        );
        let output = write(
            &dir,
            "it.po",
            &format!("{HEADER}{}", plural.replace("{0}", "%d documento").replace("{1}", "%d documenti")),
        );
        let oracle = MockOracle::new(MockMode::Echo);
        let report = translate_catalog(&input, &output, &config(), &oracle).await.unwrap();
        assert_eq!(oracle.calls(), 0);
        assert_eq!(report.stats.already_translated, 1);
        let saved = Catalog::load(&output).unwrap();
        assert_eq!(
            saved.find(None, "%d file").unwrap().msgstr_plural,
            vec!["%d documento", "%d documenti"]
        );
    }

    #[tokio::test]
    async fn test_plural_without_slots_uses_target_rules() {
        let oracle = MockOracle::new(MockMode::Echo);
        let config = config();
        let translator = CatalogTranslator::new(&config, &oracle).unwrap();
        let mut entry = CatalogEntry::new_plural("%d day", "%d days", Vec::new());
        translator.translate_entry(&mut entry).await.unwrap();
        assert_eq!(entry.msgstr_plural, vec!["%d day", "%d days"]);
        assert_eq!(oracle.calls(), 2);
    }

    #[tokio::test]
    async fn test_single_input_slot_gets_every_target_slot() {
        let oracle = MockOracle::new(MockMode::Echo);
        let config = config();
        let translator = CatalogTranslator::new(&config, &oracle).unwrap();
        let mut entry =
            CatalogEntry::new_plural("%d file", "%d files", vec!["%d fichier".to_string()]);
        translator.translate_entry(&mut entry).await.unwrap();

        assert_eq!(entry.msgstr_plural, vec!["%d file", "%d files"]);
        assert!(entry.is_translated());
        let prompts = oracle.user_prompts();
        assert!(prompts[0].contains("French translation: \"%d fichier\""));
        assert!(prompts[1].contains("French translation: \"%d files\""));
    }

    #[tokio::test]
    async fn test_empty_plural_answer_keeps_slots_filled() {
        let dir = TempDir::new().unwrap();
        let po = format!(
            "{HEADER}\nmsgid \"%d file\"\nmsgid_plural \"%d files\"\nmsgstr[0] \"%d fichier\"\nmsgstr[1] \"%d fichiers\"\n"
        );
        let input = write(&dir, "fr.po", &po);
        let output = dir.path().join("it.po");
        let oracle = MockOracle::new(MockMode::Reply("\"\"".to_string()));

        let report = translate_catalog(&input, &output, &config(), &oracle).await.unwrap();
        assert_eq!(report.stats.translated, 1);
        let saved = Catalog::load(&output).unwrap();
        let entry = saved.find(None, "%d file").unwrap();
        assert_eq!(entry.msgstr_plural, vec!["%d fichier", "%d fichiers"]);
        assert!(entry.is_translated());
    }

    #[tokio::test]
    async fn test_target_language_in_any_spelling() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "fr.po", &entries_po(THREE));
        for target in ["italian", "it"] {
            let output = dir.path().join(format!("{target}.po"));
            let config = config().for_target(target);
            let oracle = MockOracle::new(MockMode::Echo);
            let report = translate_catalog(&input, &output, &config, &oracle).await.unwrap();
            assert_eq!(report.stats.translated, 3);
            assert!(oracle.prompts()[0].0.contains("Italian"));
            let saved = Catalog::load(&output).unwrap();
            assert_eq!(saved.metadata("Language"), Some("it"));
        }
    }

    #[tokio::test]
    async fn test_reuse_respects_context() {
        let dir = TempDir::new().unwrap();
        let po = format!(
            "{HEADER}\nmsgctxt \"menu\"\nmsgid \"Open\"\nmsgstr \"Ouvrir\"\n\nmsgid \"Open\"\nmsgstr \"Ouvert\"\n"
        );
        let input = write(&dir, "fr.po", &po);
        let output = write(
            &dir,
            "it.po",
            &format!("{HEADER}\nmsgctxt \"menu\"\nmsgid \"Open\"\nmsgstr \"Apri\"\n"),
        );
        let oracle = MockOracle::new(MockMode::Reply("\"Aperto\"".to_string()));
        let report = translate_catalog(&input, &output, &config(), &oracle).await.unwrap();
        assert_eq!(report.stats.already_translated, 1);
        assert_eq!(report.stats.translated, 1);

        let saved = Catalog::load(&output).unwrap();
        assert_eq!(saved.find(Some("menu"), "Open").unwrap().msgstr, "Apri");
        assert_eq!(saved.find(None, "Open").unwrap().msgstr, "Aperto");
    }

    #[tokio::test]
    async fn test_header_is_rewritten_on_every_run() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "django.po", &entries_po(&[("Hello", "Bonjour")]));
        let output = dir.path().join("it.po");
        let with_owner = RunConfig {
            owner: Some("Acme".to_string()),
            owner_mail: Some("l10n@acme.test".to_string()),
            ..config()
        };
        translate_catalog(&input, &output, &with_owner, &MockOracle::new(MockMode::Echo))
            .await
            .unwrap();

        let saved = Catalog::load(&output).unwrap();
        let banner = saved.header_comment().unwrap();
        assert!(banner.starts_with("Italian translations for the django application."));
        assert!(banner.contains("Copyright (C) "));
        assert!(banner.contains("using the mock-model model"));
        assert!(banner.contains("Acme <l10n@acme.test>"));
        assert_eq!(saved.metadata("Language"), Some("it"));
        assert_eq!(
            saved.metadata("Plural-Forms"),
            Some("nplurals=2; plural=(n != 1);")
        );
        assert_eq!(saved.metadata("Project-Id-Version"), Some("demo 1.0"));
        assert_eq!(
            saved.metadata("Last-Translator"),
            Some("auto-po-lyglot using mock-model")
        );
        let date = saved.metadata("PO-Revision-Date").unwrap();
        assert_eq!(date.len(), "2024-08-07 20:09+0000".len());
        assert!(date.ends_with("+0000"));

        // nothing left to translate, header still updated
        let renamed = RunConfig {
            model: Some("bigger-model".to_string()),
            ..with_owner
        };
        let oracle = MockOracle::new(MockMode::Echo);
        translate_catalog(&input, &output, &renamed, &oracle).await.unwrap();
        assert_eq!(oracle.calls(), 0);
        let saved = Catalog::load(&output).unwrap();
        assert_eq!(
            saved.metadata("Last-Translator"),
            Some("auto-po-lyglot using bigger-model")
        );
    }

    #[tokio::test]
    async fn test_compile_writes_mo_file() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "fr.po", &entries_po(THREE));
        let output = dir.path().join("it.po");
        let compile = RunConfig {
            compile: true,
            ..config()
        };
        let report = translate_catalog(&input, &output, &compile, &MockOracle::new(MockMode::Echo))
            .await
            .unwrap();
        let mo_path = dir.path().join("it.mo");
        assert_eq!(report.compiled.as_deref(), Some(mo_path.as_path()));
        let bytes = std::fs::read(&mo_path).unwrap();
        assert_eq!(&bytes[0..4], &crate::catalog::mo::MO_MAGIC.to_le_bytes());
    }

    #[tokio::test]
    async fn test_configuration_error_before_any_call() {
        let dir = TempDir::new().unwrap();
        let input = write(&dir, "de.po", &entries_po(&[("Hallo", "Ciao")]));
        let output = dir.path().join("es.po");
        let config = RunConfig {
            original_language: "German".to_string(),
            context_language: "Italian".to_string(),
            ..config()
        };
        let oracle = MockOracle::new(MockMode::Echo);
        let err = translate_catalog(&input, &output, &config, &oracle).await.unwrap_err();
        assert!(matches!(
            err,
            PoLyglotError::Config(ConfigError::MissingAmbiguousExample { .. })
        ));
        assert_eq!(oracle.calls(), 0);
        assert!(!output.exists());
    }

    #[test]
    fn test_bad_user_template_is_rejected_early() {
        let config = RunConfig {
            user_prompt: Some("Translate {phrase}".to_string()),
            ..config()
        };
        let oracle = MockOracle::new(MockMode::Echo);
        let err = CatalogTranslator::new(&config, &oracle).err().unwrap();
        assert!(matches!(
            err,
            PoLyglotError::Config(ConfigError::UnknownTemplateKey(key)) if key == "phrase"
        ));
    }

    #[tokio::test]
    async fn test_large_prompt_for_caching_backends() {
        let oracle = MockOracle::new(MockMode::Echo).with_large_prompt(true);
        let config = config();
        let translator = CatalogTranslator::new(&config, &oracle).unwrap();
        translator.translate_phrase("Hello", "Bonjour").await.unwrap();
        let (system, _) = &oracle.prompts()[0];
        assert!(system.contains("Additional system prompt examples:"));
    }

    #[tokio::test]
    async fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let err = translate_catalog(
            &dir.path().join("missing.po"),
            &dir.path().join("it.po"),
            &config(),
            &MockOracle::new(MockMode::Echo),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, PoLyglotError::Catalog(_)));
    }

    #[tokio::test]
    async fn test_obsolete_entries_are_kept_untouched() {
        let dir = TempDir::new().unwrap();
        let po = format!("{HEADER}\nmsgid \"Hello\"\nmsgstr \"Bonjour\"\n\n#~ msgid \"Old\"\n#~ msgstr \"Vieux\"\n");
        let input = write(&dir, "fr.po", &po);
        let output = dir.path().join("it.po");
        let oracle = MockOracle::new(MockMode::Echo);
        let report = translate_catalog(&input, &output, &config(), &oracle).await.unwrap();
        assert_eq!(oracle.calls(), 1);
        assert_eq!(report.stats.total, 1);
        let saved = Catalog::load(&output).unwrap();
        let old = saved.entries().iter().find(|e| e.obsolete).unwrap();
        assert_eq!(old.msgstr, "Vieux");
    }
}
