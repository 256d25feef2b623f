//! Command-line interface definition for BibliaAI
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for generation, history, theme and schema inspection.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// BibliaAI - Bible studies and sermons generated by AI
///
/// Generate a structured Bible study and complete sermon for a topic,
/// with optional illustrations and a local history of past studies.
#[derive(Parser, Debug, Clone)]
#[command(name = "bibliaai")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Override the provider from config (gemini, ollama)
    #[arg(short, long, global = true)]
    pub provider: Option<String>,

    /// Path to the local storage database
    #[arg(long, env = "BIBLIA_STORAGE_DB", global = true)]
    pub storage_path: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for BibliaAI
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate a study and sermon for a topic
    Generate {
        /// Topic or short description, e.g. "A Graça"
        topic: String,

        /// Add the study to history (in addition to any automatic recording)
        #[arg(short, long)]
        save: bool,

        /// Skip illustration generation
        #[arg(long)]
        no_images: bool,

        /// Directory where generated illustrations are written
        #[arg(long)]
        images_dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },

    /// Manage the study history
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Show or change the display theme
    Theme {
        /// Theme subcommand
        #[command(subcommand)]
        command: ThemeCommand,
    },

    /// Print the response schema sent to the model
    Schema {
        /// Schema dialect
        #[arg(short, long, value_enum, default_value_t = SchemaDialect::Gemini)]
        dialect: SchemaDialect,
    },
}

/// History subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List recent studies, most recent first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate a new study from a past entry's title
    Open {
        /// Entry id or a unique prefix of it (as shown by `history list`)
        id: String,

        /// Skip illustration generation
        #[arg(long)]
        no_images: bool,

        /// Directory where generated illustrations are written
        #[arg(long)]
        images_dir: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,
    },
    /// Remove every entry
    Clear,
}

/// Theme subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ThemeCommand {
    /// Show the current theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Set a specific theme
    Set {
        /// Theme to use
        #[arg(value_enum)]
        theme: ThemeArg,
    },
}

/// Study output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Full Markdown document
    Markdown,
    /// Raw structured JSON
    Json,
    /// Short share text
    Share,
}

/// Schema dialects
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaDialect {
    /// Gemini responseSchema (upper-case types)
    Gemini,
    /// Standard JSON Schema
    Json,
}

/// Theme values accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: Some("config/config.yaml".to_string()),
            verbose: false,
            json_logs: false,
            provider: None,
            storage_path: None,
            command: Commands::Schema {
                dialect: SchemaDialect::Gemini,
            },
        }
    }
}
