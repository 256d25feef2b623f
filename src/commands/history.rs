use super::generate::{run_open, OutputOptions};
use crate::cli::HistoryCommand;
use crate::config::Config;
use crate::error::Result;
use crate::storage::{HistoryStore, SqliteKeyValueStore, TimelineEntry};
use chrono::{Local, TimeZone};
use colored::Colorize;
use prettytable::{format, Table};
use std::sync::Arc;

/// Handle history commands
pub async fn handle_history(config: Config, command: HistoryCommand) -> Result<()> {
    match command {
        HistoryCommand::List { json } => {
            let history = load_history(&config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(history.list())?);
                return Ok(());
            }

            if history.list().is_empty() {
                println!("{}", "No studies in history.".yellow());
                return Ok(());
            }

            println!("\nStudy History:");
            build_table(history.list()).printstd();
            println!();
        }
        HistoryCommand::Open {
            id,
            no_images,
            images_dir,
            format,
        } => {
            let output = OutputOptions {
                no_images,
                images_dir,
                format,
            };
            run_open(config, &id, output).await?;
        }
        HistoryCommand::Clear => {
            load_history(&config)?.clear()?;
            println!("{}", "History cleared.".green());
        }
    }

    Ok(())
}

fn load_history(config: &Config) -> Result<HistoryStore> {
    let store = Arc::new(SqliteKeyValueStore::new()?);
    HistoryStore::load(store, config.history.max_entries)
}

fn build_table(entries: &[TimelineEntry]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

    table.add_row(prettytable::row![
        "ID".bold(),
        "Title".bold(),
        "Theme".bold(),
        "Created".bold()
    ]);

    for entry in entries {
        let id_short: String = entry.id.chars().take(8).collect();
        let title = truncate(&entry.title, 40);
        let theme = truncate(&entry.theme, 30);
        table.add_row(prettytable::row![
            id_short.cyan(),
            title,
            theme,
            format_timestamp(entry.timestamp)
        ]);
    }

    table
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        let head: String = text.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    } else {
        text.to_string()
    }
}

fn format_timestamp(millis: i64) -> String {
    Local
        .timestamp_millis_opt(millis)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}
