// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{error, warn, info, debug, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use clap::{Parser, ValueEnum, CommandFactory, Subcommand, ArgAction};
use clap_complete::{generate, Shell};
use indicatif::{ProgressBar, ProgressStyle};

use srtranslator::app_config::{self, Config, API_KEY_ENV};
use srtranslator::errors::AppError;
use srtranslator::providers::TranslationBackend;
use srtranslator::{SubtitleCollection, TranslationAdapter};

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
    /// Generate shell completions for srtranslator
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// srtranslator - SRT subtitle translation through DeepL
///
/// Translates an SRT file entry by entry, applying the glossary kept in
/// glossary/glossary.csv whenever the language pair allows it.
#[derive(Parser, Debug)]
#[command(name = "srtranslator")]
#[command(version)]
#[command(about = "Translate SRT subtitles through DeepL with a synchronized glossary")]
#[command(long_about = "srtranslator translates SRT subtitle files through the DeepL API.

EXAMPLES:
    srtranslator movie.srt                          # Translate using default config
    srtranslator -i en -o fr movie.srt              # Translate from English to French
    srtranslator -w 42 movie.srt                    # Reflow lines to 42 characters
    srtranslator --auth <KEY> movie.srt             # Use a specific API key
    srtranslator -vv movie.srt                      # Debug logging
    srtranslator completions bash > srtranslator.bash

GLOSSARY:
    Terms listed in glossary/glossary.csv (one 'source,target' pair per line)
    are uploaded to DeepL whenever the file changes and applied to every
    translation. A glossary needs an explicit source language.

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The API key may also come from DEEPL_API_KEY,
    including through a .env file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input SRT file to translate
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Source language code (e.g., 'en', 'es', 'fr') or 'auto'
    #[arg(short = 'i', long)]
    src_lang: Option<String>,

    /// Target language code (e.g., 'en', 'es', 'fr', 'pt-br')
    #[arg(short = 'o', long)]
    dest_lang: Option<String>,

    /// Maximum characters per subtitle line
    #[arg(short, long)]
    wrap_limit: Option<usize>,

    /// DeepL API key
    #[arg(long)]
    auth: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, action = ArgAction::Count)]
    verbose: u8,

    /// Shorthand for --log-level debug
    #[arg(long)]
    debug: bool,
}

impl CommandLineOptions {
    // @returns: Log level requested on the command line, if any
    fn requested_log_level(&self) -> Option<app_config::LogLevel> {
        if let Some(level) = &self.log_level {
            return Some(level.clone().into());
        }
        if self.debug || self.verbose >= 2 {
            return Some(app_config::LogLevel::Debug);
        }
        if self.verbose == 1 {
            return Some(app_config::LogLevel::Info);
        }
        None
    }

    // @modifies: Config with command line overrides
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(source_lang) = &self.src_lang {
            config.source_language = source_lang.clone();
        }
        if let Some(target_lang) = &self.dest_lang {
            config.target_language = target_lang.clone();
        }
        if let Some(wrap_limit) = self.wrap_limit {
            config.wrap_limit = wrap_limit;
        }
        if let Some(key) = &self.auth {
            config.deepl.api_key = key.clone();
        }
        if let Some(level) = self.requested_log_level() {
            config.log_level = level;
        }
    }
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
        // The logger accepts everything; the global max level does the filtering
        let logger = Box::new(CustomLogger::new(LevelFilter::Trace));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
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
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {} {}\x1B[0m",
                color, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Warn until the configuration says otherwise
    CustomLogger::init(LevelFilter::Warn)?;

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "srtranslator", &mut std::io::stdout());
        return Ok(());
    }

    let input_path = cli.input_path.clone().ok_or_else(|| {
        anyhow!("INPUT_PATH is required when no subcommand is specified")
    })?;

    run_translate(&cli, &input_path).await
}

async fn run_translate(options: &CommandLineOptions, input_path: &Path) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(level) = options.requested_log_level() {
        log::set_max_level(level.to_level_filter());
    }

    match dotenvy::dotenv() {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Failed to load .env file: {}", e),
    }

    let mut config = Config::load_or_create(&options.config_path)?;
    options.apply_overrides(&mut config);
    config.apply_api_key_fallback(std::env::var(API_KEY_ENV).ok());

    config.validate()
        .context("Configuration validation failed")?;

    log::set_max_level(config.log_level.to_level_filter());

    if !input_path.is_file() {
        return Err(anyhow!("Input file does not exist: {:?}", input_path));
    }

    let mut adapter = TranslationAdapter::from_config(&config)
        .await
        .context("Failed to initialize the translator")?;

    let result = translate_file(&mut adapter, &config, input_path).await;
    adapter.quit();

    let output_path = result?;
    info!("Success: {:?}", output_path);
    Ok(())
}

/// Translate one SRT file and write `<stem>_<dest>.srt` next to it.
///
/// A failed translation leaves a `<stem>_backup.srt` holding whatever was
/// translated before the failure.
async fn translate_file<B: TranslationBackend>(
    adapter: &mut TranslationAdapter<B>,
    config: &Config,
    input_path: &Path,
) -> Result<PathBuf, AppError> {
    let mut subtitles = SubtitleCollection::from_file(input_path, &config.source_language)?;
    info!(
        "Translating {} entries from {} to {}",
        subtitles.entries.len(), config.source_language, config.target_language
    );

    let progress = ProgressBar::new(subtitles.entries.len() as u64);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} entries ({percent}%) {eta}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style.progress_chars("=>-"));

    let translated = subtitles
        .translate(adapter, &config.source_language, &config.target_language, Some(&progress))
        .await;

    if let Err(e) = translated {
        progress.abandon();
        error!("Translation failed: {}", e);
        if let Err(backup_error) = subtitles.save_backup() {
            error!("Failed to save backup: {}", backup_error);
        }
        return Err(e.into());
    }
    progress.finish_and_clear();

    subtitles.wrap_lines(config.wrap_limit);

    let output_path = subtitles.output_path(&config.target_language);
    subtitles.write_to_srt(&output_path)?;

    Ok(output_path)
}
