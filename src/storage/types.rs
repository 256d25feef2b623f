use serde::{Deserialize, Serialize};

/// A past generation shown on the study timeline
///
/// Serialized with exactly the fields `id`, `title`, `theme` and
/// `timestamp` (epoch milliseconds).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Study title
    pub title: String,
    /// Study theme
    pub theme: String,
    /// Creation time in epoch milliseconds
    pub timestamp: i64,
}

impl TimelineEntry {
    /// Whether this entry records the same `(title, theme)` pair
    pub fn matches(&self, title: &str, theme: &str) -> bool {
        self.title == title && self.theme == theme
    }
}
