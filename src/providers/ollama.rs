//! Ollama provider implementation for BibliaAI
//!
//! This module implements [`GenerationCapability`] for Ollama, connecting to
//! a local or remote Ollama server. Structured content is requested through
//! the `format` field carrying a JSON Schema. Ollama has no image
//! generation, so illustration requests always come back empty.

use crate::config::OllamaConfig;
use crate::error::{BibliaError, Result};
use crate::providers::{
    build_http_client, ContentRequest, GenerationCapability, ImageRequest, InlineImage,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama API provider
///
/// # Examples
///
/// ```no_run
/// use bibliaai::config::OllamaConfig;
/// use bibliaai::content::describe;
/// use bibliaai::providers::{ContentRequest, GenerationCapability, OllamaProvider};
///
/// # async fn example() -> bibliaai::error::Result<()> {
/// let provider = OllamaProvider::new(OllamaConfig::default(), None)?;
/// let request = ContentRequest {
///     instruction: "Crie um estudo sobre a fé".to_string(),
///     system_instruction: "Você é um mentor espiritual".to_string(),
///     schema: describe(),
/// };
/// let raw = provider.generate_structured(&request).await?;
/// # Ok(())
/// # }
/// ```
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
}

/// Request structure for Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    format: serde_json::Value,
    stream: bool,
}

/// Message structure for Ollama API
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
}

/// Response structure from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Ollama configuration containing host and model
    /// * `timeout` - Optional per-request timeout
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use bibliaai::config::OllamaConfig;
    /// use bibliaai::providers::OllamaProvider;
    ///
    /// let provider = OllamaProvider::new(OllamaConfig::default(), None);
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: OllamaConfig, timeout: Option<Duration>) -> Result<Self> {
        let client = build_http_client(timeout)?;

        tracing::info!(
            "Initialized Ollama provider: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self { client, config })
    }

    /// Get the configured Ollama host
    pub fn host(&self) -> &str {
        &self.config.host
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_request(&self, request: &ContentRequest) -> OllamaRequest {
        OllamaRequest {
            model: self.config.model.clone(),
            messages: vec![
                OllamaMessage {
                    role: "system".to_string(),
                    content: request.system_instruction.clone(),
                },
                OllamaMessage {
                    role: "user".to_string(),
                    content: request.instruction.clone(),
                },
            ],
            format: request.schema.to_json_schema(),
            stream: false,
        }
    }
}

#[async_trait]
impl GenerationCapability for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate_structured(&self, request: &ContentRequest) -> Result<String> {
        let url = format!("{}/api/chat", self.config.host.trim_end_matches('/'));
        let ollama_request = self.build_request(request);

        tracing::debug!(model = %ollama_request.model, "Sending Ollama structured request");

        let response = self
            .client
            .post(&url)
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                BibliaError::Provider(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(BibliaError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            BibliaError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        tracing::debug!(
            "Ollama response: done={}, prompt_tokens={}, completion_tokens={}",
            ollama_response.done,
            ollama_response.prompt_eval_count,
            ollama_response.eval_count
        );

        if ollama_response.message.content.trim().is_empty() {
            return Err(BibliaError::Provider("Ollama returned no text".to_string()).into());
        }

        Ok(ollama_response.message.content)
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<InlineImage>> {
        tracing::debug!(
            prompt_len = request.prompt.len(),
            "Ollama has no image generation; skipping illustration"
        );
        Ok(None)
    }
}
