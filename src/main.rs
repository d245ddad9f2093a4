// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{info, warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::PathBuf;
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use i18n_agent::app_config::{self, Config, TranslationProvider};
use i18n_agent::app_controller::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Anthropic,
    Ollama,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List documentation pages that have no translation yet
    Find {
        /// Local checkout of the documented repository
        #[arg(value_name = "REPO", default_value = ".")]
        repo: PathBuf,

        /// Number of pages to list (defaults to docs.top_k)
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Translate one documentation page
    Translate {
        /// Local checkout of the documented repository
        #[arg(value_name = "REPO")]
        repo: PathBuf,

        /// Page path relative to the source language folder (e.g. quicktour.md)
        #[arg(value_name = "FILE")]
        file: String,

        /// Force overwrite of an existing translation
        #[arg(short, long)]
        force: bool,
    },

    /// Show a page and the prompt it would be translated with, without calling the model
    Preview {
        /// Local checkout of the documented repository
        #[arg(value_name = "REPO")]
        repo: PathBuf,

        /// Page path relative to the source language folder (e.g. quicktour.md)
        #[arg(value_name = "FILE")]
        file: String,
    },

    /// Find missing pages and translate them one after another
    Run {
        /// Local checkout of the documented repository
        #[arg(value_name = "REPO", default_value = ".")]
        repo: PathBuf,

        /// Number of pages to translate (defaults to docs.top_k)
        #[arg(short, long)]
        k: Option<usize>,

        /// Force overwrite of existing translations
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions for i18n-agent
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// i18n-agent - documentation translation assistant
///
/// Finds documentation pages without a translation and translates them with
/// an LLM while keeping code blocks, tables and heading anchors intact.
#[derive(Parser, Debug)]
#[command(name = "i18n-agent")]
#[command(version)]
#[command(about = "LLM-assisted translation of markdown documentation")]
#[command(long_about = "i18n-agent lists documentation pages missing a translation and translates them
with an LLM. Only prose is sent to the model; code blocks, tables and comments
are copied verbatim and every heading receives its [[anchor]] from the source.

EXAMPLES:
    i18n-agent find ~/transformers -k 5               # List 5 untranslated pages
    i18n-agent translate ~/transformers quicktour.md  # Translate one page
    i18n-agent preview ~/transformers quicktour.md    # Show the prompt for a page
    i18n-agent -t ja run ~/transformers -k 3          # Translate 3 pages into Japanese
    i18n-agent -p mock translate . quicktour.md       # Dry run without a model
    i18n-agent completions bash > i18n-agent.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. If the file doesn't exist,
    a default one is created. The Anthropic API key may also be given through
    the ANTHROPIC_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Translation provider to use
    #[arg(short, long, global = true, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Target language code (e.g., 'ko', 'ja', 'zh')
    #[arg(short, long, global = true)]
    target_language: Option<String>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                Self::get_color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config says otherwise
    CustomLogger::init(LevelFilter::Info)?;

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "i18n-agent", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&cli)?;
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let top_k = config.docs.top_k;
    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Find { repo, k } => {
            let search = controller.find_files(&repo, k.unwrap_or(top_k))?;
            println!("{}", search.summary.report_table());
            for (i, file) in search.files.iter().enumerate() {
                println!("{}. {}", i + 1, file);
            }
        }
        Commands::Translate { repo, file, force } => {
            let translated = controller.translate_file(&repo, &file, force).await?;
            if !translated.diagnostics.is_empty() {
                warn!(
                    "{} finding(s) in {}; please review before opening a PR",
                    translated.diagnostics.len(),
                    translated.output_path.display()
                );
            }
            if let Some(entry) = &translated.toctree_entry {
                info!("Listed as '{}' in the toctree", entry.title.as_deref().unwrap_or_default());
            }
            println!("{}", translated.output_path.display());
        }
        Commands::Preview { repo, file } => {
            let preview = controller.preview(&repo, &file)?;
            println!("{}\n", preview.content);
            println!("--- prompt ({} paragraphs, {} headings) ---", preview.placeholder_count, preview.anchors.len());
            println!("{}", preview.prompt);
        }
        Commands::Run { repo, k, force } => {
            let session = controller.run_session(&repo, k.unwrap_or(top_k), force).await?;
            info!("Session finished at step '{}' (version {})", session.step(), session.version());
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load or create the configuration and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let mut config = Config::load_or_create(&cli.config_path)?;

    if let Some(provider) = &cli.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &cli.model {
        config.translation.set_model(model.clone());
    }

    if let Some(target_lang) = &cli.target_language {
        config.target_language = target_lang.clone();
    }

    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    }

    config.validate()
        .context("Configuration validation failed")?;

    Ok(config)
}
