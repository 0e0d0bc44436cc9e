use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use clap::builder::BoolishValueParser;
use po_lyglot::{ConfigError, RunConfig, default_output_path, translate_catalog};
use po_lyglot_llm::{ClientSettings, LlmClientKind, build_oracle};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Translate a gettext catalog with an LLM, using an existing translation
/// into a second language as context.
#[derive(Parser, Debug)]
#[command(name = "auto-po-lyglot", version)]
struct Cli {
    /// LLM back-end: openai, ollama, claude, claude_cached or mock
    #[arg(long, env = "LLM_CLIENT", default_value = "ollama")]
    llm: LlmClientKind,

    /// Model name; each back-end has its own default
    #[arg(long, env = "LLM_MODEL")]
    model: Option<String>,

    /// Language of the msgids
    #[arg(long, env = "ORIGINAL_LANGUAGE", default_value = "English")]
    original_language: String,

    /// Language of the msgstrs of the input catalog
    #[arg(long, env = "CONTEXT_LANGUAGE", default_value = "French")]
    context_language: String,

    /// Comma separated list of languages to translate into, by name or code
    #[arg(
        long = "target-languages",
        env = "TARGET_LANGUAGES",
        value_delimiter = ',',
        default_value = "Spanish"
    )]
    target_languages: Vec<String>,

    /// Catalog holding the phrases and their context translations
    #[arg(long, env = "INPUT_PO")]
    input_po: PathBuf,

    /// Output catalog; defaults to <stem>.<code>.po next to the input
    #[arg(long, env = "OUTPUT_PO")]
    output_po: Option<PathBuf>,

    /// System prompt template replacing the built-in one
    #[arg(long, env = "SYSTEM_PROMPT")]
    system_prompt: Option<String>,

    /// User prompt template replacing the built-in one
    #[arg(long, env = "USER_PROMPT")]
    user_prompt: Option<String>,

    /// Copyright owner named in the header
    #[arg(long, env = "OWNER")]
    owner: Option<String>,

    #[arg(long, env = "OWNER_EMAIL")]
    owner_email: Option<String>,

    /// Application name for the header; the input file name otherwise
    #[arg(long, env = "APP_NAME")]
    app_name: Option<String>,

    #[arg(long, env = "TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    #[arg(long, env = "OLLAMA_BASE_URL")]
    ollama_base_url: Option<String>,

    /// Pause after every LLM call, in milliseconds
    #[arg(long, env = "PACING_DELAY_MS", default_value_t = 1000)]
    delay_ms: u64,

    /// Translate again entries already present in the output catalog
    #[arg(long, env = "FORCE", value_parser = BoolishValueParser::new())]
    force: bool,

    /// Also translate entries flagged fuzzy
    #[arg(long, env = "FUZZY", value_parser = BoolishValueParser::new())]
    fuzzy: bool,

    /// Also write a compiled .mo file
    #[arg(long, env = "COMPILE", value_parser = BoolishValueParser::new())]
    compile: bool,

    /// Log prompts and requests
    #[arg(short, long, env = "VERBOSE", value_parser = BoolishValueParser::new())]
    verbose: bool,
}

impl Cli {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            original_language: self.original_language.clone(),
            context_language: self.context_language.clone(),
            target_language: String::new(),
            system_prompt: self.system_prompt.clone(),
            user_prompt: self.user_prompt.clone(),
            force: self.force,
            fuzzy: self.fuzzy,
            compile: self.compile,
            owner: self.owner.clone(),
            owner_mail: self.owner_email.clone(),
            model: None,
            app_name: self.app_name.clone(),
            pacing_delay: Duration::from_millis(self.delay_ms),
        }
    }

    fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            kind: self.llm,
            model: self.model.clone(),
            temperature: self.temperature,
            ollama_base_url: self.ollama_base_url.clone(),
        }
    }

    fn output_for(&self, target_language: &str) -> Result<PathBuf, ConfigError> {
        match &self.output_po {
            Some(path) if self.target_languages.len() == 1 => Ok(path.clone()),
            Some(_) => Err(ConfigError::Invalid(
                "--output-po needs exactly one target language".to_string(),
            )),
            None => default_output_path(&self.input_po, target_language),
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    let oracle = build_oracle(&cli.client_settings())?;
    info!(
        "Using model {} to translate {} from {} -> {} -> {:?} with the {} client",
        oracle.model(),
        cli.input_po.display(),
        cli.original_language,
        cli.context_language,
        cli.target_languages,
        cli.llm
    );

    let base_config = cli.run_config();
    let mut failed = false;
    for target_language in cli.target_languages.iter().map(|t| t.trim()) {
        let config = base_config.for_target(target_language).normalized()?;
        let target_language = config.target_language.as_str();
        let output = cli.output_for(target_language)?;

        match translate_catalog(&cli.input_po, &output, &config, oracle.as_ref()).await {
            Ok(report) => match &report.failure {
                None => println!("✅ {}: {} ({})", target_language, report.stats, output.display()),
                Some(failure) => {
                    failed = true;
                    println!(
                        "⚠️  {}: stopped early, {} ({})",
                        target_language,
                        report.stats,
                        output.display()
                    );
                    eprintln!("❌ {}", failure);
                }
            },
            Err(e) => {
                error!("{} translation failed: {}", target_language, e);
                eprintln!("❌ {}: {}", target_language, e);
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
