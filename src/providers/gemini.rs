//! Google Gemini provider implementation for BibliaAI
//!
//! Talks to the Gemini REST `generateContent` endpoint. Study content uses
//! JSON response mode with `responseSchema`; illustrations use the image
//! model with a fixed aspect ratio and come back as `inlineData` parts.

use crate::config::GeminiConfig;
use crate::error::{BibliaError, Result};
use crate::providers::{
    build_http_client, ContentRequest, GenerationCapability, ImageRequest, InlineImage,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Gemini API provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
}

/// Request body for `models/{model}:generateContent`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineImage>,
}

#[derive(Debug, Serialize, Default)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn first_parts(&self) -> &[GeminiPart] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|c| c.parts.as_slice())
            .unwrap_or(&[])
    }

    /// Concatenated text parts of the first candidate
    fn text(&self) -> Option<String> {
        let text: String = self
            .first_parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// First inline image of the first candidate
    fn first_inline_image(&self) -> Option<InlineImage> {
        self.first_parts()
            .iter()
            .find_map(|p| p.inline_data.clone())
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// # Errors
    ///
    /// Returns [`BibliaError::MissingCredentials`] when no API key is
    /// configured, or an error if HTTP client initialization fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibliaai::config::GeminiConfig;
    /// use bibliaai::providers::GeminiProvider;
    ///
    /// let config = GeminiConfig {
    ///     api_key: Some("test-key".to_string()),
    ///     ..Default::default()
    /// };
    /// assert!(GeminiProvider::new(config, None).is_ok());
    /// assert!(GeminiProvider::new(Default::default(), None).is_err());
    /// ```
    pub fn new(config: GeminiConfig, timeout: Option<Duration>) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| BibliaError::MissingCredentials("gemini".to_string()))?;

        let client = build_http_client(timeout)?;

        tracing::info!(
            "Initialized Gemini provider: content_model={}, image_model={}",
            config.content_model,
            config.image_model
        );

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.api_base.trim_end_matches('/'),
            model
        )
    }

    fn content_body(request: &ContentRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(request.instruction.clone()),
                    inline_data: None,
                }],
            }],
            system_instruction: Some(GeminiContent {
                role: None,
                parts: vec![GeminiPart {
                    text: Some(request.system_instruction.clone()),
                    inline_data: None,
                }],
            }),
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(request.schema.to_gemini_value()),
                image_config: None,
            }),
        }
    }

    fn image_body(request: &ImageRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: Some(request.prompt.clone()),
                    inline_data: None,
                }],
            }],
            system_instruction: None,
            generation_config: Some(GenerationConfig {
                image_config: Some(ImageConfig {
                    aspect_ratio: request.aspect_ratio.clone(),
                }),
                ..Default::default()
            }),
        }
    }

    async fn send(&self, model: &str, body: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        let url = self.endpoint(model);
        tracing::debug!(model = %model, "Sending Gemini generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                BibliaError::Provider(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(BibliaError::Provider(format!(
                "Gemini returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            BibliaError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            tracing::warn!(block_reason = %reason, "Gemini blocked the prompt");
        }

        Ok(parsed)
    }
}

#[async_trait]
impl GenerationCapability for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_structured(&self, request: &ContentRequest) -> Result<String> {
        let body = Self::content_body(request);
        let response = self.send(&self.config.content_model, &body).await?;

        response.text().ok_or_else(|| {
            let reason = response
                .candidates
                .first()
                .and_then(|c| c.finish_reason.clone())
                .unwrap_or_else(|| "unknown".to_string());
            BibliaError::Provider(format!(
                "No text response received (finish reason: {})",
                reason
            ))
            .into()
        })
    }

    async fn generate_image(&self, request: &ImageRequest) -> Result<Option<InlineImage>> {
        let body = Self::image_body(request);
        let response = self.send(&self.config.image_model, &body).await?;

        let image = response.first_inline_image();
        if image.is_none() {
            tracing::debug!("Gemini image response contained no inline image");
        }
        Ok(image)
    }
}
