// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, warn};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use app_controller::Controller;

mod address;
mod app_config;
mod app_controller;
mod document;
mod errors;
mod file_utils;
mod ooxml;
mod pipeline;
mod providers;
mod translation_client;

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
    /// Translate an office document using an AI provider (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Write a default configuration file and exit
    ExampleConfig {
        /// Where to write the config file
        #[arg(default_value = "conf.json")]
        path: PathBuf,
    },

    /// Generate shell completions for transdoc
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input document (.pptx, .docx or .xlsx)
    #[arg(value_name = "INPUT_FILE")]
    input_file: PathBuf,

    /// Target language, free text (e.g. 'Japanese', 'Vietnamese', 'English',
    /// 'Mandarin', 'Hindi', 'Arabic', 'Spanish')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Output directory for the translated document
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Model name (or Azure deployment name) to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// transdoc - AI-powered office document translator
///
/// Extracts translatable text from presentations, word documents and
/// spreadsheets, translates it with an LLM and writes it back without
/// disturbing formatting or layout.
#[derive(Parser, Debug)]
#[command(name = "transdoc")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered office document translator")]
#[command(long_about = "transdoc translates .pptx, .docx and .xlsx files with an LLM while
preserving run-level formatting (size, color, bold/italic/underline).

EXAMPLES:
    transdoc deck.pptx -t Japanese              # Translate a slide deck
    transdoc report.docx -t Spanish -o out/     # Translate into a directory
    transdoc -f data.xlsx -t French             # Force overwrite existing output
    transdoc example-config                     # Write a default conf.json
    transdoc completions bash > transdoc.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a
    different file with --config-path. If the config file doesn't exist, a
    default one will be created automatically. Set api_version in the config
    to talk to an Azure OpenAI deployment.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input document (.pptx, .docx or .xlsx)
    #[arg(value_name = "INPUT_FILE")]
    input_file: Option<PathBuf>,

    /// Target language, free text
    #[arg(short, long)]
    target_language: Option<String>,

    /// Output directory for the translated document
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Model name (or Azure deployment name) to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
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
            let color = Self::color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {}\x1B[0m", color, now, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "transdoc", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::ExampleConfig { path }) => {
            Config::default().save_to_file(&path)?;
            println!("Wrote default configuration to {:?}", path);
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_file = cli
                .input_file
                .ok_or_else(|| anyhow!("INPUT_FILE is required when no subcommand is specified"))?;
            let translate_args = TranslateArgs {
                input_file,
                target_language: cli.target_language,
                output_dir: cli.output_dir,
                force_overwrite: cli.force_overwrite,
                model: cli.model,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(config_log_level.to_level_filter());
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if Path::new(config_path).exists() {
        Config::from_file(config_path)
            .context(format!("Failed to load config file: {}", config_path))?
    } else {
        warn!(
            "Config file not found at '{}', creating default config.",
            config_path
        );
        let config = Config::default();
        config
            .save_to_file(config_path)
            .context(format!("Failed to write default config: {}", config_path))?;
        config
    };

    // Override config with CLI options if provided
    if let Some(model) = &options.model {
        config.translation.model = model.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let target_language = options
        .target_language
        .clone()
        .or_else(|| config.default_target_language.clone())
        .ok_or_else(|| {
            anyhow!("No target language: pass --target-language or set default_target_language in the config")
        })?;

    let controller = Controller::with_config(config)?;
    controller
        .run(
            options.input_file,
            options.output_dir,
            &target_language,
            options.force_overwrite,
        )
        .await
}
