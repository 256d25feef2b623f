//! Provider module for BibliaAI
//!
//! This module contains the generative capability abstraction and its
//! implementations for Google Gemini and Ollama, plus a scripted fake used
//! by tests.

pub mod base;
pub mod fake;
pub mod gemini;
pub mod ollama;

pub use base::{ContentRequest, GenerationCapability, ImageRequest, InlineImage};
pub use fake::FakeCapability;
pub use gemini::GeminiProvider;
pub use ollama::OllamaProvider;

use crate::config::ProviderConfig;
use crate::error::{BibliaError, Result};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

/// Build the shared HTTP client used by the network providers
///
/// No timeout is applied unless one is configured.
pub(crate) fn build_http_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder().user_agent(concat!("bibliaai/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| BibliaError::Provider(format!("Failed to create HTTP client: {}", e)).into())
}

/// Create a capability instance based on configuration
///
/// # Arguments
///
/// * `config` - Provider configuration; `provider_type` selects the backend
///
/// # Errors
///
/// Returns error if provider type is invalid or initialization fails
/// (for example a missing Gemini API key)
///
/// # Examples
///
/// ```
/// use bibliaai::config::{GeminiConfig, OllamaConfig, ProviderConfig};
/// use bibliaai::providers::create_capability;
///
/// let config = ProviderConfig {
///     provider_type: "ollama".to_string(),
///     gemini: GeminiConfig::default(),
///     ollama: OllamaConfig::default(),
///     request_timeout_seconds: None,
/// };
/// let capability = create_capability(&config).unwrap();
/// assert_eq!(capability.name(), "ollama");
/// ```
pub fn create_capability(config: &ProviderConfig) -> Result<Arc<dyn GenerationCapability>> {
    let timeout = config.request_timeout_seconds.map(Duration::from_secs);

    match config.provider_type.as_str() {
        "gemini" => Ok(Arc::new(GeminiProvider::new(config.gemini.clone(), timeout)?)),
        "ollama" => Ok(Arc::new(OllamaProvider::new(config.ollama.clone(), timeout)?)),
        other => Err(BibliaError::Provider(format!("Unknown provider type: {}", other)).into()),
    }
}
