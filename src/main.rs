//! BibliaAI - Bible studies and sermons generated by AI
//!
#![doc = "Main entry point for the BibliaAI command-line application."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bibliaai::cli::{Cli, Commands};
use bibliaai::commands;
use bibliaai::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose, cli.json_logs);

    // Mirror a CLI storage path into BIBLIA_STORAGE_DB so
    // `SqliteKeyValueStore::new()` picks it up.
    if let Some(db_path) = &cli.storage_path {
        std::env::set_var("BIBLIA_STORAGE_DB", db_path);
        tracing::debug!("Using storage DB override: {}", db_path);
    }

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    // Validate configuration
    config.validate()?;

    match cli.command {
        Commands::Generate {
            topic,
            save,
            no_images,
            images_dir,
            format,
        } => {
            tracing::debug!("Starting study generation");
            let options = commands::GenerateOptions {
                topic,
                save,
                output: commands::OutputOptions {
                    no_images,
                    images_dir,
                    format,
                },
            };
            commands::run_generate(config, options).await?;
            Ok(())
        }
        Commands::History { command } => {
            commands::handle_history(config, command).await?;
            Ok(())
        }
        Commands::Theme { command } => {
            commands::handle_theme(&config, command)?;
            Ok(())
        }
        Commands::Schema { dialect } => {
            commands::handle_schema(dialect)?;
            Ok(())
        }
    }
}

/// Initialize the tracing subscriber
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output for
/// this crate. Logs go to stderr so they never mix with command output.
fn init_tracing(verbose: bool, json: bool) {
    let default_level = if verbose { "bibliaai=debug" } else { "bibliaai=info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
