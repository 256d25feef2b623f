//! Capability trait and common request types
//!
//! This module defines the [`GenerationCapability`] trait that every
//! generative backend implements. The rest of the crate only talks to this
//! trait, so tests can substitute a scripted fake and vendors can be swapped
//! through configuration.

use crate::content::SchemaNode;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Schema-constrained text generation request
#[derive(Debug, Clone)]
pub struct ContentRequest {
    /// Natural-language instruction, including the user's topic
    pub instruction: String,
    /// Persona directive sent as system instruction
    pub system_instruction: String,
    /// Shape the response must follow
    pub schema: SchemaNode,
}

/// Single image generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    /// Full prompt, style prefix already applied
    pub prompt: String,
    /// Aspect ratio such as `16:9`
    pub aspect_ratio: String,
}

/// Inline image payload returned by a capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    /// Mime type reported by the backend, e.g. `image/png`
    pub mime_type: String,
    /// Base64 encoded image bytes
    pub data: String,
}

impl InlineImage {
    /// Re-encode as a directly displayable data URI
    ///
    /// # Examples
    ///
    /// ```
    /// use bibliaai::providers::InlineImage;
    ///
    /// let image = InlineImage {
    ///     mime_type: "image/png".to_string(),
    ///     data: "iVBORw0KGgo=".to_string(),
    /// };
    /// assert_eq!(image.to_data_uri(), "data:image/png;base64,iVBORw0KGgo=");
    /// ```
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// External generative capability
///
/// Implementations perform exactly one backend call per method invocation.
/// They do not retry and do not enforce timeouts beyond what their HTTP
/// client was configured with.
#[async_trait]
pub trait GenerationCapability: Send + Sync {
    /// Short backend name used in logs
    fn name(&self) -> &str;

    /// Generate text constrained to `request.schema`
    ///
    /// Returns the raw response text; validation is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns error on transport failures, non-success HTTP status, quota
    /// errors, or when the backend returns no text at all.
    async fn generate_structured(&self, request: &ContentRequest) -> Result<String>;

    /// Generate a single image
    ///
    /// Returns `Ok(None)` when the backend answered without an image.
    ///
    /// # Errors
    ///
    /// Returns error on transport failures or non-success HTTP status.
    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<InlineImage>>;
}
