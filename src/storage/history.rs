//! Persisted study history
//!
//! The list lives under [`HISTORY_KEY`] as a JSON array, most recent first.
//! Entries are deduplicated on the exact `(title, theme)` pair and the list
//! is capped; the oldest entries fall off the end.

use super::{KeyValueStore, TimelineEntry, HISTORY_KEY};
use crate::error::{BibliaError, Result};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

/// Default number of entries kept
pub const DEFAULT_MAX_ENTRIES: usize = 10;

/// Deduplicated, size-capped history with write-through persistence
pub struct HistoryStore {
    store: Arc<dyn KeyValueStore>,
    entries: Vec<TimelineEntry>,
    max_entries: usize,
}

impl HistoryStore {
    /// Restore the history from `store`
    ///
    /// A missing key yields an empty history. Undecodable data is logged and
    /// treated as empty; it is overwritten by the next successful `add`.
    /// Lists longer than `max_entries` are truncated in memory.
    ///
    /// # Errors
    ///
    /// Fails only when the store itself cannot be read.
    pub fn load(store: Arc<dyn KeyValueStore>, max_entries: usize) -> Result<Self> {
        let mut entries = match store.get(HISTORY_KEY)? {
            Some(raw) => decode(&raw).unwrap_or_else(|e| {
                tracing::warn!("Failed to parse history: {}", e);
                Vec::new()
            }),
            None => Vec::new(),
        };
        entries.truncate(max_entries);

        tracing::debug!(entries = entries.len(), "Loaded study history");

        Ok(Self {
            store,
            entries,
            max_entries,
        })
    }

    /// Record a generation
    ///
    /// # Returns
    ///
    /// `false` when an entry with the same title and theme already exists;
    /// the list is left untouched in that case.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting the updated list fails. The in-memory
    /// list is left unchanged.
    pub fn add(&mut self, title: &str, theme: &str) -> Result<bool> {
        if self.entries.iter().any(|e| e.matches(title, theme)) {
            tracing::debug!(title = %title, theme = %theme, "Study already in history");
            return Ok(false);
        }

        let entry = TimelineEntry {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            theme: theme.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        };

        let mut updated = Vec::with_capacity(self.max_entries);
        updated.push(entry);
        updated.extend(self.entries.iter().cloned());
        updated.truncate(self.max_entries);

        self.persist(&updated)?;
        self.entries = updated;

        tracing::info!(title = %title, entries = self.entries.len(), "Saved study to history");
        Ok(true)
    }

    /// Entries, most recent first
    pub fn list(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// Find the entry whose id starts with `id_prefix`
    ///
    /// # Errors
    ///
    /// Returns [`BibliaError::HistoryEntryNotFound`] when the prefix is
    /// blank, matches nothing, or matches more than one entry.
    pub fn find(&self, id_prefix: &str) -> Result<&TimelineEntry> {
        let id_prefix = id_prefix.trim();
        if id_prefix.is_empty() {
            return Err(BibliaError::HistoryEntryNotFound("empty id".to_string()).into());
        }

        let mut matches = self.entries.iter().filter(|e| e.id.starts_with(id_prefix));
        match (matches.next(), matches.next()) {
            (Some(entry), None) => Ok(entry),
            (None, _) => Err(BibliaError::HistoryEntryNotFound(id_prefix.to_string()).into()),
            (Some(_), Some(_)) => Err(BibliaError::HistoryEntryNotFound(format!(
                "'{}' matches more than one entry",
                id_prefix
            ))
            .into()),
        }
    }

    /// Remove every entry and the persisted key
    pub fn clear(&mut self) -> Result<()> {
        self.store.remove(HISTORY_KEY)?;
        self.entries.clear();
        tracing::info!("Cleared study history");
        Ok(())
    }

    /// Maximum number of entries kept
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    fn persist(&self, entries: &[TimelineEntry]) -> Result<()> {
        let raw = serde_json::to_string(entries)?;
        self.store.set(HISTORY_KEY, &raw)
    }
}

fn decode(raw: &str) -> std::result::Result<Vec<TimelineEntry>, BibliaError> {
    serde_json::from_str(raw).map_err(|e| BibliaError::StorageDecode(e.to_string()))
}
