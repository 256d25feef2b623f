use crate::cli::{ThemeArg, ThemeCommand};
use crate::config::Config;
use crate::error::Result;
use crate::storage::{KeyValueStore, SqliteKeyValueStore, Theme, ThemePreference};
use colored::Colorize;
use std::sync::Arc;

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

/// Handle theme commands
pub fn handle_theme(config: &Config, command: ThemeCommand) -> Result<()> {
    let store = Arc::new(SqliteKeyValueStore::new()?);
    let theme = apply(store, config.preferences.prefers_dark, command)?;
    println!("Theme: {}", theme.to_string().cyan());
    Ok(())
}

fn apply(
    store: Arc<dyn KeyValueStore>,
    prefers_dark: bool,
    command: ThemeCommand,
) -> Result<Theme> {
    let mut preference = ThemePreference::load(store, prefers_dark)?;

    match command {
        ThemeCommand::Show => {}
        ThemeCommand::Toggle => {
            preference.toggle()?;
        }
        ThemeCommand::Set { theme } => preference.set(theme.into())?,
    }

    Ok(preference.current())
}
