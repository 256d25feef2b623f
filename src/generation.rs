//! Content and illustration requests
//!
//! [`GenerationClient`] is the only place that talks to the injected
//! [`GenerationCapability`]. It builds the study instruction, validates the
//! structured response, and turns inline image payloads into displayable
//! [`GeneratedImage`]s. It never retries; a failed request is terminal and
//! must be re-initiated by the caller.

use crate::content::{self, GeneratedImage, StudyContent};
use crate::error::{BibliaError, Result};
use crate::prompts::{build_illustration_prompt, generate_study_prompt, PERSONA};
use crate::providers::{ContentRequest, GenerationCapability, ImageRequest};
use std::sync::Arc;

/// Issues study and illustration requests against a capability
#[derive(Clone)]
pub struct GenerationClient {
    capability: Arc<dyn GenerationCapability>,
    aspect_ratio: String,
}

impl GenerationClient {
    /// Create a client over `capability`, requesting images at `aspect_ratio`
    pub fn new(capability: Arc<dyn GenerationCapability>, aspect_ratio: impl Into<String>) -> Self {
        Self {
            capability,
            aspect_ratio: aspect_ratio.into(),
        }
    }

    /// Name of the underlying capability
    pub fn capability_name(&self) -> &str {
        self.capability.name()
    }

    /// Request a structured study for `topic`
    ///
    /// # Errors
    ///
    /// Every failure, whether transport, quota, empty response or schema
    /// violation, is reported as [`BibliaError::Generation`].
    pub async fn request_content(&self, topic: &str) -> Result<StudyContent> {
        let request = ContentRequest {
            instruction: generate_study_prompt(topic),
            system_instruction: PERSONA.to_string(),
            schema: content::describe(),
        };

        tracing::info!(
            capability = self.capability.name(),
            topic = %topic,
            "Requesting study content"
        );

        let raw = self
            .capability
            .generate_structured(&request)
            .await
            .map_err(|e| {
                tracing::error!("Error generating study: {}", e);
                BibliaError::Generation(e.to_string())
            })?;

        if raw.trim().is_empty() {
            tracing::error!("Error generating study: empty response");
            return Err(BibliaError::Generation("No text response received".to_string()).into());
        }

        let study = content::parse(&raw).map_err(|e| {
            tracing::error!("Generated study failed validation: {}", e);
            BibliaError::Generation(e.to_string())
        })?;

        tracing::info!(
            title = %study.title,
            theme = %study.theme,
            verses = study.key_verses.len(),
            "Study generated"
        );

        Ok(study)
    }

    /// Request one illustration for `prompt`
    ///
    /// The fixed artistic style prefix is prepended before sending.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the capability answered without an image.
    ///
    /// # Errors
    ///
    /// Transport failures are returned as-is; the batch layer absorbs them.
    pub async fn request_illustration(&self, prompt: &str) -> Result<Option<GeneratedImage>> {
        let request = ImageRequest {
            prompt: build_illustration_prompt(prompt),
            aspect_ratio: self.aspect_ratio.clone(),
        };

        let image = self.capability.generate_image(&request).await?;

        Ok(image.map(|inline| GeneratedImage {
            url: inline.to_data_uri(),
            prompt: prompt.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::ILLUSTRATION_STYLE_PREFIX;
    use crate::providers::{FakeCapability, InlineImage};
    use crate::test_utils::sample_study_value;

    fn client(fake: FakeCapability) -> (GenerationClient, Arc<FakeCapability>) {
        let fake = Arc::new(fake);
        (GenerationClient::new(fake.clone(), "16:9"), fake)
    }

    fn is_generation_error(err: &anyhow::Error) -> bool {
        matches!(
            err.downcast_ref::<BibliaError>(),
            Some(BibliaError::Generation(_))
        )
    }

    #[tokio::test]
    async fn test_request_content_success() {
        let (client, fake) =
            client(FakeCapability::new().with_content(sample_study_value().to_string()));

        let study = client.request_content("A Graça").await.unwrap();
        assert_eq!(study.theme, "Graça Salvadora");
        assert_eq!(study.key_verses.len(), 4);

        let sent = fake.last_content_request().unwrap();
        assert!(sent.instruction.contains("\"A Graça\""));
        assert_eq!(sent.system_instruction, PERSONA);
        assert!(sent.schema.property("sermon_body").is_some());
    }

    #[tokio::test]
    async fn test_transport_failure_becomes_generation_error() {
        let (client, fake) = client(FakeCapability::new().with_content_error("429 quota"));
        let err = client.request_content("Fé").await.unwrap_err();
        assert!(is_generation_error(&err));
        assert!(err.to_string().contains("429 quota"));
        assert_eq!(fake.content_calls(), 1, "no retry expected");
    }

    #[tokio::test]
    async fn test_schema_failure_becomes_generation_error() {
        let mut value = sample_study_value();
        value.as_object_mut().unwrap().remove("hymns");
        let (client, _) = client(FakeCapability::new().with_content(value.to_string()));

        let err = client.request_content("Fé").await.unwrap_err();
        assert!(is_generation_error(&err));
        assert!(err.to_string().contains("hymns"));
    }

    #[tokio::test]
    async fn test_empty_response_becomes_generation_error() {
        let (client, _) = client(FakeCapability::new().with_content("  "));
        let err = client.request_content("Fé").await.unwrap_err();
        assert!(is_generation_error(&err));
    }

    #[tokio::test]
    async fn test_request_illustration_builds_data_uri() {
        let (client, fake) = client(FakeCapability::new().with_image(
            "shepherd",
            InlineImage {
                mime_type: "image/png".to_string(),
                data: "iVBOR".to_string(),
            },
        ));

        let image = client
            .request_illustration("A shepherd at dawn")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(image.url, "data:image/png;base64,iVBOR");
        assert_eq!(image.prompt, "A shepherd at dawn");

        let sent = fake.image_requests();
        assert_eq!(
            sent[0].prompt,
            format!("{}A shepherd at dawn", ILLUSTRATION_STYLE_PREFIX)
        );
        assert_eq!(sent[0].aspect_ratio, "16:9");
    }

    #[tokio::test]
    async fn test_request_illustration_without_image_is_none() {
        let (client, _) = client(FakeCapability::new());
        assert!(client.request_illustration("x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_request_illustration_surfaces_transport_error() {
        let (client, _) = client(FakeCapability::new().with_image_error("x", "offline"));
        assert!(client.request_illustration("x").await.is_err());
    }
}
