//! Structured study content
//!
//! The data model produced by a generation request: the study itself,
//! its key verses and hymn suggestions, and the transient illustrations
//! fetched for it afterwards.

pub mod render;
pub mod schema;

use serde::{Deserialize, Serialize};

pub use render::{hymn_search_url, share_text, to_markdown};
pub use schema::{describe, parse, SchemaKind, SchemaNode, REQUIRED_FIELDS};

/// A Bible verse quoted by the study
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibleVerse {
    /// Reference such as "João 3:16"
    pub reference: String,
    /// Full verse text
    pub text: String,
}

/// A suggested hymn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hymn {
    /// Hymn title
    pub title: String,
    /// Number in the hymnal, when the model supplied one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Short theological reason for the choice
    pub reason: String,
}

/// Generated study and sermon
///
/// Instances come out of [`schema::parse`], which guarantees that every
/// field listed in [`REQUIRED_FIELDS`] is present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyContent {
    pub title: String,
    /// Short label; used for display and history keying
    #[serde(default)]
    pub theme: String,
    pub introduction: String,
    pub key_verses: Vec<BibleVerse>,
    /// Full sermon text in Markdown
    pub sermon_body: String,
    /// Image generation prompts; never displayed
    pub illustration_prompts: Vec<String>,
    #[serde(default)]
    pub practical_application: String,
    pub conclusion: String,
    pub hymns: Vec<Hymn>,
}

/// An illustration produced for one prompt
///
/// Held only by the view that requested it; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Data URI (`data:<mime>;base64,<payload>`) or remote URL
    pub url: String,
    /// Prompt that produced the image
    pub prompt: String,
}

impl GeneratedImage {
    /// Split a data URI into its mime type and base64 payload
    ///
    /// Returns `None` for remote URLs or malformed data URIs.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibliaai::content::GeneratedImage;
    ///
    /// let image = GeneratedImage {
    ///     url: "data:image/png;base64,AAAA".to_string(),
    ///     prompt: "dawn".to_string(),
    /// };
    /// assert_eq!(image.data_uri_parts(), Some(("image/png", "AAAA")));
    /// ```
    pub fn data_uri_parts(&self) -> Option<(&str, &str)> {
        let rest = self.url.strip_prefix("data:")?;
        let (mime, payload) = rest.split_once(";base64,")?;
        Some((mime, payload))
    }
}
