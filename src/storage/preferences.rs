use super::{KeyValueStore, THEME_KEY};
use crate::error::{BibliaError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Display theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// Stored representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// The opposite theme
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = BibliaError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(BibliaError::StorageDecode(format!(
                "unknown theme '{}'",
                other
            ))),
        }
    }
}

/// Persisted theme flag
///
/// Every mutation is written to the store before returning.
pub struct ThemePreference {
    store: Arc<dyn KeyValueStore>,
    current: Theme,
}

impl ThemePreference {
    /// Restore the theme from `store`
    ///
    /// With nothing stored, `prefers_dark_default` picks dark. Any stored
    /// value other than `dark` means light.
    pub fn load(store: Arc<dyn KeyValueStore>, prefers_dark_default: bool) -> Result<Self> {
        let current = match store.get(THEME_KEY)? {
            Some(raw) => raw.parse().unwrap_or_else(|e: BibliaError| {
                tracing::warn!("Ignoring stored theme: {}", e);
                Theme::Light
            }),
            None if prefers_dark_default => Theme::Dark,
            None => Theme::Light,
        };

        Ok(Self { store, current })
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// Flip between light and dark
    pub fn toggle(&mut self) -> Result<Theme> {
        let next = self.current.toggled();
        self.set(next)?;
        Ok(next)
    }

    pub fn set(&mut self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str())?;
        self.current = theme;
        tracing::debug!(theme = %theme, "Theme updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::memory_store;

    #[test]
    fn test_default_follows_environment_preference() {
        assert_eq!(
            ThemePreference::load(memory_store(), true).unwrap().current(),
            Theme::Dark
        );
        assert_eq!(
            ThemePreference::load(memory_store(), false).unwrap().current(),
            Theme::Light
        );
    }

    #[test]
    fn test_stored_value_wins_over_default() {
        let store = memory_store();
        store.set(THEME_KEY, "light").unwrap();
        let pref = ThemePreference::load(store, true).unwrap();
        assert_eq!(pref.current(), Theme::Light);
    }

    #[test]
    fn test_toggle_persists() {
        let store = memory_store();
        let mut pref = ThemePreference::load(store.clone(), false).unwrap();

        assert_eq!(pref.toggle().unwrap(), Theme::Dark);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("dark"));

        let reloaded = ThemePreference::load(store, false).unwrap();
        assert_eq!(reloaded.current(), Theme::Dark);
    }

    #[test]
    fn test_unknown_stored_value_means_light() {
        for prefers_dark in [true, false] {
            let store = memory_store();
            store.set(THEME_KEY, "sepia").unwrap();
            let pref = ThemePreference::load(store, prefers_dark).unwrap();
            assert_eq!(pref.current(), Theme::Light);
        }
    }

    #[test]
    fn test_theme_string_forms() {
        assert_eq!(Theme::Dark.to_string(), "dark");
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert!("Dark".parse::<Theme>().is_err());
    }
}
